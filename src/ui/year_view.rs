use chrono::{Datelike, Months};
use serde::{Deserialize, Serialize};

use crate::calendar::event::{CalendarEvent, badge_total};
use crate::calendar::filter::filter_in_period;
use crate::calendar::period::{Granularity, Period, end_of};
use crate::ui::{Cell, ViewContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearLayout {
    pub year: i32,
    pub months: Vec<Cell>,
}

pub fn calculate_layout<F>(events: &[CalendarEvent], ctx: &ViewContext, mut cell_modifier: F) -> YearLayout
where
    F: FnMut(&mut Cell),
{
    let week_start = ctx.week_start();
    let year = Period::of(ctx.view_date, Granularity::Year, week_start);
    let formats = ctx.config.formatting.date_formats();
    let current_month = ctx.today.with_day(1).unwrap_or(ctx.today);

    let in_year = filter_in_period(events, year.start, year.end);

    let mut months = Vec::with_capacity(12);
    for offset in 0..12 {
        let Some(month_start) = year.start.checked_add_months(Months::new(offset)) else {
            continue;
        };
        let month_end = end_of(month_start, Granularity::Month, week_start);

        let month_events: Vec<CalendarEvent> = filter_in_period(in_year.iter().copied(), month_start, month_end)
            .into_iter()
            .cloned()
            .collect();

        let mut cell = Cell {
            label: ctx.format(month_start, &formats.month),
            date: month_start.date(),
            is_today: month_start.date() == current_month,
            in_month: true,
            is_past: month_end.date() < ctx.today,
            is_future: month_start.date() > ctx.today,
            is_weekend: false,
            badge_total: badge_total(&month_events),
            events: month_events,
            css_class: None,
        };

        cell_modifier(&mut cell);
        months.push(cell);
    }

    tracing::debug!(year = ctx.view_date.year(), events = in_year.len(), "built year view");

    YearLayout {
        year: ctx.view_date.year(),
        months,
    }
}

pub fn month_of(layout: &YearLayout, month: u32) -> Option<&Cell> {
    layout.months.iter().find(|cell| cell.date.month() == month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::RecursOn;
    use crate::storage::config::Config;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        date(year, month, day).and_hms_opt(hour, 0, 0).unwrap()
    }

    fn build(events: &[CalendarEvent], view_date: NaiveDate) -> YearLayout {
        let config = Config::default();
        let ctx = ViewContext::new(&config, view_date).with_today(date(2019, 6, 15));
        calculate_layout(events, &ctx, |_| {})
    }

    #[test]
    fn year_layout_has_twelve_months() {
        let layout = build(&[], date(2025, 6, 15));

        assert_eq!(layout.months.len(), 12);
        assert_eq!(layout.year, 2025);
        assert_eq!(layout.months[0].date, date(2025, 1, 1));
        assert_eq!(layout.months[11].date, date(2025, 12, 1));
    }

    #[test]
    fn months_are_labelled_with_month_format() {
        let layout = build(&[], date(2025, 6, 15));

        assert_eq!(layout.months[0].label, "January");
        assert_eq!(layout.months[2].label, "March");
    }

    #[test]
    fn event_lands_only_in_its_month() {
        let events = vec![CalendarEvent::new("An event", at(2019, 3, 10, 11)).with_end(at(2019, 3, 10, 19))];

        let layout = build(&events, date(2019, 3, 1));

        let march = &layout.months[2];
        assert_eq!(march.events, events);
        assert_eq!(march.badge_total, 1);
        for (index, cell) in layout.months.iter().enumerate() {
            if index != 2 {
                assert!(cell.events.is_empty(), "month {} should be empty", index + 1);
                assert_eq!(cell.badge_total, 0);
            }
        }
    }

    #[test]
    fn month_of_finds_cell_by_number() {
        let layout = build(&[], date(2019, 3, 1));

        assert_eq!(month_of(&layout, 3).map(|c| c.date), Some(date(2019, 3, 1)));
    }

    #[test]
    fn current_month_is_marked_today() {
        let layout = build(&[], date(2019, 1, 1));

        let today_cells: Vec<_> = layout.months.iter().filter(|c| c.is_today).collect();

        assert_eq!(today_cells.len(), 1);
        assert_eq!(today_cells[0].date, date(2019, 6, 1));
        assert!(layout.months[0].is_past);
        assert!(layout.months[11].is_future);
    }

    #[test]
    fn yearly_event_shows_in_every_viewed_year() {
        let events = vec![
            CalendarEvent::new("Anniversary", at(2010, 7, 4, 12))
                .with_end(at(2010, 7, 4, 13))
                .with_recurrence(RecursOn::Year),
        ];

        let layout = build(&events, date(2019, 1, 1));

        assert_eq!(layout.months[6].events.len(), 1);
        assert_eq!(layout.months[6].events[0].starts_at, at(2010, 7, 4, 12));
    }

    #[test]
    fn monthly_event_shows_in_every_month() {
        let events = vec![CalendarEvent::new("Rent", at(2018, 2, 1, 9)).with_recurrence(RecursOn::Month)];

        let layout = build(&events, date(2019, 1, 1));

        assert!(layout.months.iter().all(|c| c.events.len() == 1));
    }

    #[test]
    fn badge_total_ignores_opted_out_events() {
        let events = vec![
            CalendarEvent::new("counted", at(2019, 3, 10, 9)),
            CalendarEvent::new("silent", at(2019, 3, 11, 9)).with_badge(false),
        ];

        let layout = build(&events, date(2019, 3, 1));

        assert_eq!(layout.months[2].events.len(), 2);
        assert_eq!(layout.months[2].badge_total, 1);
    }

    #[test]
    fn cell_modifier_sees_every_cell() {
        let config = Config::default();
        let ctx = ViewContext::new(&config, date(2019, 1, 1));
        let mut visited = 0;

        let layout = calculate_layout(&[], &ctx, |cell| {
            visited += 1;
            if cell.date.month() % 2 == 1 {
                cell.css_class = Some("odd-cell".to_string());
            }
        });

        assert_eq!(visited, 12);
        assert_eq!(layout.months[0].css_class.as_deref(), Some("odd-cell"));
        assert_eq!(layout.months[1].css_class, None);
    }

    #[test]
    fn building_twice_gives_identical_output_and_leaves_input_untouched() {
        let events = vec![
            CalendarEvent::new("Anniversary", at(2010, 7, 4, 12)).with_recurrence(RecursOn::Year),
        ];
        let before = events.clone();

        let first = build(&events, date(2019, 1, 1));
        let second = build(&events, date(2019, 1, 1));

        assert_eq!(first, second);
        assert_eq!(events, before);
    }
}
