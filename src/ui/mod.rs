pub mod cascade;
pub mod day_view;
pub mod month_view;
pub mod week_times_view;
pub mod week_view;
pub mod year_view;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::event::CalendarEvent;
use crate::calendar::format::format_date;
use crate::calendar::period::WeekStart;
use crate::storage::config::Config;

#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub config: &'a Config,
    pub view_date: NaiveDate,
    pub today: NaiveDate,
}

impl<'a> ViewContext<'a> {
    pub fn new(config: &'a Config, view_date: NaiveDate) -> Self {
        Self {
            config,
            view_date,
            today: Local::now().date_naive(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_view_date(mut self, view_date: NaiveDate) -> Self {
        self.view_date = view_date;
        self
    }

    pub fn week_start(&self) -> WeekStart {
        self.config.calendar.week_starts_on
    }

    pub fn format(&self, datetime: NaiveDateTime, pattern: &str) -> String {
        format_date(datetime, pattern, self.config.formatting.date_formatter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub label: String,
    pub date: NaiveDate,
    pub is_today: bool,
    pub in_month: bool,
    pub is_past: bool,
    pub is_future: bool,
    pub is_weekend: bool,
    pub events: Vec<CalendarEvent>,
    pub badge_total: usize,
    pub css_class: Option<String>,
}
