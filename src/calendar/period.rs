use std::fmt;

use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekStart(Weekday);

impl WeekStart {
    pub fn new(weekday: Weekday) -> Self {
        Self(weekday)
    }

    pub fn weekday(&self) -> Weekday {
        self.0
    }

    pub fn days_into_week(&self, weekday: Weekday) -> u32 {
        (7 + weekday.num_days_from_sunday() - self.0.num_days_from_sunday()) % 7
    }
}

impl Default for WeekStart {
    fn default() -> Self {
        Self(Weekday::Sun)
    }
}

impl TryFrom<u8> for WeekStart {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        weekday_from_number(value).map(Self)
    }
}

impl From<WeekStart> for u8 {
    fn from(value: WeekStart) -> Self {
        value.0.num_days_from_sunday() as u8
    }
}

pub fn weekday_from_number(value: u8) -> Result<Weekday, EngineError> {
    match value {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(EngineError::Configuration(format!(
            "weekday must be between 0 and 6, got {}",
            other
        ))),
    }
}

// A calendar window. `end` is the last millisecond that still belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Period {
    pub fn of(date: NaiveDate, granularity: Granularity, week_start: WeekStart) -> Self {
        let datetime = date.and_time(NaiveTime::MIN);
        Self {
            start: start_of(datetime, granularity, week_start),
            end: end_of(datetime, granularity, week_start),
        }
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start.date() <= date && date <= self.end.date()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.end.date();
        self.start.date().iter_days().take_while(move |d| *d <= last)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", self.start, self.end)
    }
}

pub fn start_of(datetime: NaiveDateTime, granularity: Granularity, week_start: WeekStart) -> NaiveDateTime {
    let date = datetime.date();
    let first = match granularity {
        Granularity::Year => date.with_ordinal(1).unwrap_or(date),
        Granularity::Month => date.with_day(1).unwrap_or(date),
        Granularity::Week => {
            let back = week_start.days_into_week(date.weekday());
            date.checked_sub_days(Days::new(back as u64)).unwrap_or(date)
        }
        Granularity::Day => date,
    };
    first.and_time(NaiveTime::MIN)
}

pub fn end_of(datetime: NaiveDateTime, granularity: Granularity, week_start: WeekStart) -> NaiveDateTime {
    let start = start_of(datetime, granularity, week_start);
    let next = match granularity {
        Granularity::Year => start.checked_add_months(Months::new(12)),
        Granularity::Month => start.checked_add_months(Months::new(1)),
        Granularity::Week => start.checked_add_days(Days::new(7)),
        Granularity::Day => start.checked_add_days(Days::new(1)),
    };
    next.map(|n| n - Duration::milliseconds(1))
        .unwrap_or(NaiveDateTime::MAX)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = first.and_then(|f| f.checked_add_months(Months::new(1)));
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 31,
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
