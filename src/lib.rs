pub mod app;
pub mod calendar;
pub mod error;
pub mod storage;
pub mod ui;

pub use app::{CalendarState, CalendarView, ViewType};
pub use calendar::{CalendarEvent, RecursOn};
pub use error::EngineError;
pub use storage::config::Config;
