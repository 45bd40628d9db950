use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calendar::event::{CalendarEvent, badge_total};
use crate::calendar::filter::span_intersects;
use crate::calendar::period::{Granularity, Period, end_of, is_weekend, start_of};
use crate::calendar::recurrence::{ProjectedEventPeriod, project_event};
use crate::ui::week_view::week_day_names;
use crate::ui::{Cell, ViewContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    pub week_day_names: Vec<String>,
    pub weeks: Vec<Week>,
    pub total_days_visible_in_week: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub days: Vec<Cell>,
}

impl MonthLayout {
    pub fn days(&self) -> impl Iterator<Item = &Cell> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    pub fn row_offsets(&self) -> Vec<usize> {
        (0..self.weeks.len())
            .map(|row| row * self.total_days_visible_in_week)
            .collect()
    }

    pub fn cell_for(&self, date: NaiveDate) -> Option<&Cell> {
        self.days().find(|c| c.date == date)
    }
}

pub fn calculate_layout<F>(events: &[CalendarEvent], ctx: &ViewContext, mut cell_modifier: F) -> MonthLayout
where
    F: FnMut(&mut Cell),
{
    let config = ctx.config;
    let week_start = ctx.week_start();
    let year = ctx.view_date.year();
    let month = ctx.view_date.month();

    let month_period = Period::of(ctx.view_date, Granularity::Month, week_start);
    let grid_start = start_of(month_period.start, Granularity::Week, week_start);
    let grid_end = end_of(month_period.end, Granularity::Week, week_start);

    // Recurring events are anchored to the month being shown, even on the
    // leading and trailing days borrowed from neighbouring months.
    let projected: Vec<(&CalendarEvent, ProjectedEventPeriod)> = events
        .iter()
        .map(|event| (event, project_event(event, month_period.start)))
        .filter(|(_, span)| span_intersects(span, grid_start, grid_end))
        .collect();

    let total_days_visible_in_week = (0..7u8)
        .filter(|day| !config.calendar.excluded_days.contains(day))
        .count();
    let mut days = Vec::new();

    let grid = Period {
        start: grid_start,
        end: grid_end,
    };
    for date in grid.days() {
        if config.is_excluded(date.weekday()) {
            continue;
        }

        let day_start = date.and_time(NaiveTime::MIN);
        let day_end = end_of(day_start, Granularity::Day, week_start);
        let day_events: Vec<CalendarEvent> = projected
            .iter()
            .filter(|(_, span)| span_intersects(span, day_start, day_end))
            .map(|(event, _)| (*event).clone())
            .collect();

        let in_month = date.year() == year && date.month() == month;
        let badge = badge_total(&day_events);

        let mut cell = Cell {
            label: date.day().to_string(),
            date,
            is_today: date == ctx.today,
            in_month,
            is_past: date < ctx.today,
            is_future: date > ctx.today,
            is_weekend: is_weekend(date),
            events: if in_month || config.calendar.display_all_month_events {
                day_events
            } else {
                Vec::new()
            },
            badge_total: badge,
            css_class: None,
        };

        cell_modifier(&mut cell);
        days.push(cell);
    }

    let weeks = if total_days_visible_in_week == 0 {
        Vec::new()
    } else {
        days.chunks(total_days_visible_in_week)
            .map(|chunk| Week { days: chunk.to_vec() })
            .collect()
    };

    tracing::debug!(year, month, events = projected.len(), "built month view");

    MonthLayout {
        year,
        month,
        week_day_names: week_day_names(config),
        weeks,
        total_days_visible_in_week,
    }
}
