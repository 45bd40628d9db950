use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calendar::event::CalendarEvent;
use crate::calendar::filter::filter_in_period;
use crate::calendar::period::{Granularity, Period};
use crate::calendar::recurrence::project_event;
use crate::ui::ViewContext;
use crate::ui::day_view::{PositionedEvent, layout_for_date};
use crate::ui::week_view::{DayHeader, week_headers};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekTimesLayout {
    pub week_start: NaiveDate,
    pub days: Vec<DayHeader>,
    pub events: Vec<WeekTimedEvent>,
    pub all_day_events: Vec<WeekAllDayEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekTimedEvent {
    #[serde(flatten)]
    pub positioned: PositionedEvent,
    pub offset: usize,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekAllDayEvent {
    pub event: CalendarEvent,
    pub offset: usize,
    pub date: NaiveDate,
}

pub fn calculate_layout(events: &[CalendarEvent], ctx: &ViewContext) -> WeekTimesLayout {
    let week = Period::of(ctx.view_date, Granularity::Week, ctx.week_start());
    let days = week_headers(ctx);
    let in_week = filter_in_period(events, week.start, week.end);

    let mut timed = Vec::new();
    let mut all_day_events = Vec::new();

    for (offset, header) in days.iter().enumerate() {
        let date = header.date;
        let day_start = date.and_time(NaiveTime::MIN);
        let starting_today = in_week
            .iter()
            .copied()
            .filter(|event| project_event(event, day_start).start.date() == date);

        let day = layout_for_date(starting_today, date, ctx);

        timed.extend(day.events.into_iter().map(|positioned| WeekTimedEvent {
            positioned,
            offset,
            date,
        }));
        all_day_events.extend(day.all_day_events.into_iter().map(|event| WeekAllDayEvent {
            event,
            offset,
            date,
        }));
    }

    tracing::debug!(
        week_start = %week.start.date(),
        timed = timed.len(),
        all_day = all_day_events.len(),
        "built week view with times"
    );

    WeekTimesLayout {
        week_start: week.start.date(),
        days,
        events: timed,
        all_day_events,
    }
}
