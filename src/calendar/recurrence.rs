use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::event::{CalendarEvent, RecursOn};
use crate::calendar::period::days_in_month;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedEventPeriod {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

impl ProjectedEventPeriod {
    pub fn effective_end(&self) -> NaiveDateTime {
        self.end.unwrap_or(self.start)
    }
}

pub fn project(
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
    recurs_on: RecursOn,
    containment_start: NaiveDateTime,
) -> ProjectedEventPeriod {
    let target = containment_start.date();
    let anchored = match recurs_on {
        RecursOn::None => return ProjectedEventPeriod { start, end },
        RecursOn::Year => move_date(start, target.year(), start.month()),
        RecursOn::Month => move_date(start, target.year(), target.month()),
    };

    ProjectedEventPeriod {
        start: anchored,
        end: adjust_end_from_start_diff(start, anchored, end),
    }
}

pub fn project_event(event: &CalendarEvent, containment_start: NaiveDateTime) -> ProjectedEventPeriod {
    project(event.starts_at, event.ends_at, event.recurs_on, containment_start)
}

pub fn adjust_end_from_start_diff(
    old_start: NaiveDateTime,
    new_start: NaiveDateTime,
    old_end: Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    old_end.map(|end| end + (new_start - old_start))
}

fn move_date(datetime: NaiveDateTime, year: i32, month: u32) -> NaiveDateTime {
    let day = datetime.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.and_time(datetime.time()))
        .unwrap_or(datetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn non_recurring_event_is_unchanged() {
        let start = at(2016, 5, 4, 9, 0);
        let end = Some(at(2016, 5, 4, 10, 0));

        let projected = project(start, end, RecursOn::None, at(2019, 1, 1, 0, 0));

        assert_eq!(projected, ProjectedEventPeriod { start, end });
    }

    #[test]
    fn yearly_event_moves_to_containment_year() {
        let start = at(2016, 5, 4, 9, 0);
        let end = Some(at(2016, 5, 6, 10, 0));

        let projected = project(start, end, RecursOn::Year, at(2019, 1, 1, 0, 0));

        assert_eq!(projected.start, at(2019, 5, 4, 9, 0));
        assert_eq!(projected.end, Some(at(2019, 5, 6, 10, 0)));
    }

    #[test]
    fn monthly_event_moves_to_containment_month() {
        let start = at(2016, 5, 4, 9, 0);

        let projected = project(start, None, RecursOn::Month, at(2019, 8, 1, 0, 0));

        assert_eq!(projected.start, at(2019, 8, 4, 9, 0));
        assert_eq!(projected.end, None);
    }

    #[test]
    fn leap_day_clamps_in_common_years() {
        let start = at(2020, 2, 29, 12, 0);

        let projected = project(start, None, RecursOn::Year, at(2019, 1, 1, 0, 0));

        assert_eq!(projected.start, at(2019, 2, 28, 12, 0));
    }

    #[test]
    fn month_end_clamps_to_shorter_month() {
        let start = at(2019, 1, 31, 8, 0);
        let end = Some(at(2019, 1, 31, 9, 0));

        let projected = project(start, end, RecursOn::Month, at(2019, 4, 1, 0, 0));

        assert_eq!(projected.start, at(2019, 4, 30, 8, 0));
        assert_eq!(projected.end, Some(at(2019, 4, 30, 9, 0)));
    }

    #[test]
    fn adjust_end_keeps_missing_end_missing() {
        assert_eq!(
            adjust_end_from_start_diff(at(2019, 1, 1, 0, 0), at(2019, 1, 2, 0, 0), None),
            None
        );
    }

    proptest! {
        #[test]
        fn yearly_projection_preserves_duration(
            year in 1990..2060i32,
            month in 1..=12u32,
            day in 1..=28u32,
            hour in 0..24u32,
            minutes in 0..(60 * 24 * 40i64),
            target_year in 1990..2060i32,
        ) {
            let start = at(year, month, day, hour, 0);
            let end = start + chrono::Duration::minutes(minutes);

            let projected = project(start, Some(end), RecursOn::Year, at(target_year, 1, 1, 0, 0));

            prop_assert_eq!(projected.start.year(), target_year);
            prop_assert_eq!(projected.end.map(|e| e - projected.start), Some(end - start));
        }

        #[test]
        fn monthly_projection_preserves_duration(
            day in 1..=31u32,
            minutes in 0..(60 * 24 * 10i64),
            target_month in 1..=12u32,
        ) {
            let start = at(2019, 1, day, 10, 30);
            let end = start + chrono::Duration::minutes(minutes);

            let projected = project(start, Some(end), RecursOn::Month, at(2021, target_month, 1, 0, 0));

            prop_assert_eq!(projected.start.month(), target_month);
            prop_assert_eq!(projected.end.map(|e| e - projected.start), Some(end - start));
        }
    }
}
