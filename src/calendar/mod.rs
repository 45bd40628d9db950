pub mod event;
pub mod filter;
pub mod format;
pub mod period;
pub mod recurrence;

pub use event::{CalendarEvent, EventAction, EventColor, RecursOn, badge_total, dedupe_by_calendar_event_id};
pub use filter::{filter_in_period, intersects, span_intersects};
pub use format::{DateFormats, FormatterMode, format_date};
pub use period::{Granularity, Period, WeekStart, end_of, start_of};
pub use recurrence::{ProjectedEventPeriod, adjust_end_from_start_diff, project, project_event};
