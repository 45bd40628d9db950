use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calendar::event::CalendarEvent;
use crate::calendar::filter::filter_in_period;
use crate::calendar::period::{Granularity, Period};
use crate::calendar::recurrence::project_event;
use crate::error::EngineError;
use crate::storage::config::Config;
use crate::ui::day_view::{self, DayLayout};
use crate::ui::month_view::{self, MonthLayout};
use crate::ui::week_times_view::{self, WeekTimesLayout};
use crate::ui::week_view::{self, WeekLayout};
use crate::ui::year_view::{self, YearLayout};
use crate::ui::{Cell, ViewContext};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewType {
    Year,
    #[default]
    Month,
    Week,
    WeekWithTimes,
    Day,
}

impl FromStr for ViewType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(ViewType::Year),
            "month" => Ok(ViewType::Month),
            "week" => Ok(ViewType::Week),
            "week-with-times" => Ok(ViewType::WeekWithTimes),
            "day" => Ok(ViewType::Day),
            other => Err(EngineError::Configuration(format!("Unknown view type: {}", other))),
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewType::Year => "year",
            ViewType::Month => "month",
            ViewType::Week => "week",
            ViewType::WeekWithTimes => "week-with-times",
            ViewType::Day => "day",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", content = "layout", rename_all = "kebab-case")]
pub enum CalendarView {
    Year(YearLayout),
    Month(MonthLayout),
    Week(WeekLayout),
    WeekWithTimes(WeekTimesLayout),
    Day(DayLayout),
}

impl CalendarView {
    pub fn view_type(&self) -> ViewType {
        match self {
            CalendarView::Year(_) => ViewType::Year,
            CalendarView::Month(_) => ViewType::Month,
            CalendarView::Week(_) => ViewType::Week,
            CalendarView::WeekWithTimes(_) => ViewType::WeekWithTimes,
            CalendarView::Day(_) => ViewType::Day,
        }
    }
}

pub struct CalendarState {
    pub events: Vec<CalendarEvent>,
    pub view: ViewType,
    pub view_date: NaiveDate,
    pub today: NaiveDate,
    pub config: Config,
}

impl CalendarState {
    pub fn new(config: Config) -> Self {
        let today = Local::now().date_naive();
        Self {
            events: Vec::new(),
            view: ViewType::default(),
            view_date: today,
            today,
            config,
        }
    }

    pub fn with_view(mut self, view: ViewType) -> Self {
        self.view = view;
        self
    }

    pub fn with_view_date(mut self, view_date: NaiveDate) -> Self {
        self.view_date = view_date;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn add_event(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    pub fn events_for_date(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        let day = Period::of(date, Granularity::Day, self.config.calendar.week_starts_on);
        filter_in_period(&self.events, day.start, day.end)
    }

    pub fn context(&self) -> ViewContext<'_> {
        ViewContext::new(&self.config, self.view_date).with_today(self.today)
    }

    pub fn render(&self) -> CalendarView {
        self.render_with(|_| {})
    }

    pub fn render_with<F>(&self, cell_modifier: F) -> CalendarView
    where
        F: FnMut(&mut Cell),
    {
        let ctx = self.context();
        tracing::debug!(view = %self.view, date = %self.view_date, events = self.events.len(), "rendering");

        match self.view {
            ViewType::Year => CalendarView::Year(year_view::calculate_layout(&self.events, &ctx, cell_modifier)),
            ViewType::Month => CalendarView::Month(month_view::calculate_layout(&self.events, &ctx, cell_modifier)),
            ViewType::Week => CalendarView::Week(week_view::calculate_layout(&self.events, &ctx)),
            ViewType::WeekWithTimes => {
                CalendarView::WeekWithTimes(week_times_view::calculate_layout(&self.events, &ctx))
            }
            ViewType::Day => CalendarView::Day(day_view::calculate_layout(&self.events, &ctx)),
        }
    }

    pub fn agenda(&self) -> Vec<&CalendarEvent> {
        let mut events = self.events_for_date(self.view_date);
        let day_start = self.view_date.and_time(NaiveTime::MIN);
        events.sort_by_key(|e| project_event(e, day_start).start);
        events
    }
}
