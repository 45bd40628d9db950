use std::cmp::Reverse;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calendar::event::CalendarEvent;
use crate::calendar::filter::span_intersects;
use crate::calendar::format::format_date;
use crate::calendar::period::{Granularity, Period, is_weekend, start_of};
use crate::calendar::recurrence::{ProjectedEventPeriod, project_event};
use crate::storage::config::Config;
use crate::ui::ViewContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekLayout {
    pub week_start: NaiveDate,
    pub days: Vec<DayHeader>,
    pub event_rows: Vec<EventRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHeader {
    pub date: NaiveDate,
    pub week_day_label: String,
    pub day_label: String,
    pub is_past: bool,
    pub is_today: bool,
    pub is_future: bool,
    pub is_weekend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub row: Vec<WeekEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekEvent {
    pub event: CalendarEvent,
    pub offset: usize,
    pub span: usize,
    pub starts_before_week: bool,
    pub ends_after_week: bool,
}

pub fn calculate_layout(events: &[CalendarEvent], ctx: &ViewContext) -> WeekLayout {
    let week = Period::of(ctx.view_date, Granularity::Week, ctx.week_start());
    let days = week_headers(ctx);
    let visible: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();

    let mut placed: Vec<(ProjectedEventPeriod, WeekEvent)> = events
        .iter()
        .filter_map(|event| {
            let span = project_event(event, week.start);
            if !span_intersects(&span, week.start, week.end) {
                return None;
            }
            let week_event = place_in_week(event, &span, &week, &visible)?;
            Some((span, week_event))
        })
        .collect();

    placed.sort_by_key(|(span, _)| (span.start, Reverse(span.effective_end() - span.start)));

    let event_rows = pack_rows(placed.into_iter().map(|(_, e)| e));

    tracing::debug!(week_start = %week.start.date(), rows = event_rows.len(), "built week view");

    WeekLayout {
        week_start: week.start.date(),
        days,
        event_rows,
    }
}

pub fn week_headers(ctx: &ViewContext) -> Vec<DayHeader> {
    let week = Period::of(ctx.view_date, Granularity::Week, ctx.week_start());
    let formats = ctx.config.formatting.date_formats();

    week.days()
        .filter(|date| !ctx.config.is_excluded(date.weekday()))
        .map(|date| {
            let midnight = date.and_time(NaiveTime::MIN);
            DayHeader {
                date,
                week_day_label: ctx.format(midnight, &formats.week_day),
                day_label: ctx.format(midnight, &formats.day),
                is_past: date < ctx.today,
                is_today: date == ctx.today,
                is_future: date > ctx.today,
                is_weekend: is_weekend(date),
            }
        })
        .collect()
}

pub fn week_day_names(config: &Config) -> Vec<String> {
    let Some(reference) = NaiveDate::from_ymd_opt(2000, 1, 2) else {
        return Vec::new();
    };
    let first = start_of(
        reference.and_time(NaiveTime::MIN),
        Granularity::Week,
        config.calendar.week_starts_on,
    );
    let pattern = config.formatting.date_formats().week_day;

    (0..7)
        .map(|offset| first + Duration::days(offset))
        .filter(|day| !config.is_excluded(day.weekday()))
        .map(|day| format_date(day, &pattern, config.formatting.date_formatter))
        .collect()
}

fn place_in_week(
    event: &CalendarEvent,
    span: &ProjectedEventPeriod,
    week: &Period,
    visible: &[NaiveDate],
) -> Option<WeekEvent> {
    let end = span.effective_end();
    let first_day = span.start.max(week.start).date();
    let last_day = last_occupied(span.start, end).min(week.end).date();

    let offset = visible.iter().position(|date| *date >= first_day)?;
    let columns = visible[offset..]
        .iter()
        .take_while(|date| **date <= last_day)
        .count();
    if columns == 0 {
        return None;
    }

    Some(WeekEvent {
        event: event.clone(),
        offset,
        span: columns,
        starts_before_week: span.start < week.start,
        ends_after_week: end > week.end,
    })
}

// An end exactly on midnight does not occupy the day it lands on.
fn last_occupied(start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
    if end > start && end.time() == NaiveTime::MIN {
        end - Duration::milliseconds(1)
    } else {
        end
    }
}

fn pack_rows<I>(events: I) -> Vec<EventRow>
where
    I: IntoIterator<Item = WeekEvent>,
{
    let mut rows: Vec<(usize, EventRow)> = Vec::new();

    for event in events {
        let end = event.offset + event.span;
        match rows.iter_mut().find(|(row_end, _)| event.offset >= *row_end) {
            Some((row_end, row)) => {
                *row_end = end;
                row.row.push(event);
            }
            None => rows.push((end, EventRow { row: vec![event] })),
        }
    }

    rows.into_iter().map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::RecursOn;
    use crate::calendar::period::WeekStart;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        date(2019, 3, day).and_hms_opt(hour, 0, 0).unwrap()
    }

    fn build_with(config: &Config, events: &[CalendarEvent]) -> WeekLayout {
        let ctx = ViewContext::new(config, date(2019, 3, 13)).with_today(date(2019, 3, 13));
        calculate_layout(events, &ctx)
    }

    fn build(events: &[CalendarEvent]) -> WeekLayout {
        build_with(&Config::default(), events)
    }

    fn placements(layout: &WeekLayout) -> Vec<Vec<(String, usize, usize)>> {
        layout
            .event_rows
            .iter()
            .map(|r| {
                r.row
                    .iter()
                    .map(|e| (e.event.title.clone(), e.offset, e.span))
                    .collect()
            })
            .collect()
    }

    fn weekends_off() -> Config {
        let mut config = Config::default();
        config.calendar.excluded_days = vec![0, 6];
        config
    }

    #[test]
    fn headers_cover_the_week() {
        let layout = build(&[]);

        assert_eq!(layout.week_start, date(2019, 3, 10));
        assert_eq!(layout.days.len(), 7);
        assert_eq!(layout.days[0].week_day_label, "Sunday");
        assert_eq!(layout.days[0].day_label, "10 Mar");
        assert!(layout.days[0].is_weekend);
        assert!(layout.days[0].is_past);
        assert!(layout.days[3].is_today);
        assert!(layout.days[6].is_future);
    }

    #[test]
    fn excluded_days_are_not_headers() {
        let layout = build_with(&weekends_off(), &[]);

        let dates: Vec<NaiveDate> = layout.days.iter().map(|d| d.date).collect();
        assert_eq!(dates, (11..=15).map(|d| date(2019, 3, d)).collect::<Vec<_>>());
    }

    #[test]
    fn single_day_event_takes_one_column() {
        let events = vec![CalendarEvent::new("Gym", at(11, 9)).with_end(at(11, 10))];

        let layout = build(&events);

        assert_eq!(placements(&layout), vec![vec![("Gym".to_string(), 1, 1)]]);
    }

    #[test]
    fn multi_day_event_spans_columns() {
        let events = vec![CalendarEvent::new("Conference", at(12, 9)).with_end(at(14, 17))];

        let layout = build(&events);

        assert_eq!(placements(&layout), vec![vec![("Conference".to_string(), 2, 3)]]);
    }

    #[test]
    fn end_at_midnight_does_not_claim_next_day() {
        let events = vec![CalendarEvent::new("Late", at(12, 20)).with_end(at(13, 0))];

        let layout = build(&events);

        assert_eq!(layout.event_rows[0].row[0].span, 1);
    }

    #[test]
    fn events_crossing_the_week_edges_are_flagged() {
        let events = vec![
            CalendarEvent::new("Before", at(8, 9)).with_end(at(12, 9)),
            CalendarEvent::new("After", at(15, 9)).with_end(at(18, 9)),
        ];

        let layout = build(&events);

        let before = &layout.event_rows[0].row[0];
        assert_eq!((before.offset, before.span), (0, 3));
        assert!(before.starts_before_week);
        assert!(!before.ends_after_week);

        let after = &layout.event_rows[0].row[1];
        assert_eq!((after.offset, after.span), (5, 2));
        assert!(after.ends_after_week);
    }

    #[test]
    fn events_outside_the_week_are_dropped() {
        let events = vec![
            CalendarEvent::new("Last week", at(5, 9)),
            CalendarEvent::new("Next week", at(19, 9)),
        ];

        let layout = build(&events);

        assert!(layout.event_rows.is_empty());
    }

    #[test]
    fn monday_start_puts_sunday_in_last_column() {
        let mut config = Config::default();
        config.calendar.week_starts_on = WeekStart::new(Weekday::Mon);
        let events = vec![
            CalendarEvent::new("Previous Sunday", at(10, 9)).with_end(at(10, 10)),
            CalendarEvent::new("Monday", at(11, 9)).with_end(at(11, 10)),
            CalendarEvent::new("Sunday", at(17, 9)).with_end(at(17, 10)),
        ];

        let layout = build_with(&config, &events);

        assert_eq!(layout.week_start, date(2019, 3, 11));
        assert_eq!(layout.days[0].week_day_label, "Monday");
        assert_eq!(layout.days[6].date, date(2019, 3, 17));
        assert_eq!(
            placements(&layout),
            vec![vec![("Monday".to_string(), 0, 1), ("Sunday".to_string(), 6, 1)]]
        );
    }

    #[test]
    fn non_overlapping_events_share_a_row() {
        let events = vec![
            CalendarEvent::new("Trip", at(11, 9)).with_end(at(13, 17)),
            CalendarEvent::new("Overlap", at(12, 9)).with_end(at(12, 10)),
            CalendarEvent::new("After trip", at(14, 9)).with_end(at(14, 10)),
        ];

        let layout = build(&events);

        assert_eq!(
            placements(&layout),
            vec![
                vec![("Trip".to_string(), 1, 3), ("After trip".to_string(), 4, 1)],
                vec![("Overlap".to_string(), 2, 1)],
            ]
        );
    }

    #[test]
    fn longer_event_comes_first_on_equal_start() {
        let events = vec![
            CalendarEvent::new("Short", at(11, 9)).with_end(at(11, 10)),
            CalendarEvent::new("Long", at(11, 9)).with_end(at(12, 10)),
        ];

        let layout = build(&events);

        assert_eq!(layout.event_rows[0].row[0].event.title, "Long");
        assert_eq!(layout.event_rows[1].row[0].event.title, "Short");
    }

    #[test]
    fn offsets_count_visible_columns_only() {
        let events = vec![
            CalendarEvent::new("Friday", at(15, 9)).with_end(at(17, 9)),
            CalendarEvent::new("Saturday", at(16, 9)),
        ];

        let layout = build_with(&weekends_off(), &events);

        assert_eq!(placements(&layout), vec![vec![("Friday".to_string(), 4, 1)]]);
    }

    #[test]
    fn monthly_event_is_projected_into_the_week() {
        let events = vec![
            CalendarEvent::new("Rent", date(2018, 6, 12).and_hms_opt(9, 0, 0).unwrap())
                .with_recurrence(RecursOn::Month),
        ];

        let layout = build(&events);

        assert_eq!(placements(&layout), vec![vec![("Rent".to_string(), 2, 1)]]);
    }

    #[test]
    fn week_day_names_follow_week_start_and_exclusions() {
        let mut config = weekends_off();
        config.calendar.week_starts_on = WeekStart::new(Weekday::Mon);

        let names = week_day_names(&config);

        assert_eq!(names, vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]);
    }

    #[test]
    fn week_day_names_default_to_sunday_first() {
        let names = week_day_names(&Config::default());

        assert_eq!(names.len(), 7);
        assert_eq!(names[0], "Sunday");
        assert_eq!(names[6], "Saturday");
    }
}
