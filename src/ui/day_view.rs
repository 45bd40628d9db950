use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calendar::event::{CalendarEvent, dedupe_by_calendar_event_id};
use crate::calendar::filter::span_intersects;
use crate::calendar::period::{Granularity, end_of};
use crate::calendar::recurrence::{ProjectedEventPeriod, project_event};
use crate::storage::config::{Config, DayViewConfig};
use crate::ui::ViewContext;
use crate::ui::cascade::{EventGeometry, place_in_columns, resolve_overlaps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLayout {
    pub date: NaiveDate,
    pub is_today: bool,
    pub events: Vec<PositionedEvent>,
    pub all_day_events: Vec<CalendarEvent>,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedEvent {
    pub event: CalendarEvent,
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_left: Option<f64>,
    pub starts_before_day: bool,
    pub ends_after_day: bool,
}

pub fn calculate_layout(events: &[CalendarEvent], ctx: &ViewContext) -> DayLayout {
    layout_for_date(events, ctx.view_date, ctx)
}

pub(crate) fn layout_for_date<'a, I>(events: I, date: NaiveDate, ctx: &ViewContext) -> DayLayout
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let day_view = &ctx.config.day_view;
    let day_start = date.and_time(NaiveTime::MIN);
    let day_end = end_of(day_start, Granularity::Day, ctx.week_start());
    let band_start = date.and_time(day_view.start);

    let mut timed: Vec<(&CalendarEvent, ProjectedEventPeriod)> = Vec::new();
    let mut all_day_events = Vec::new();

    for event in dedupe_by_calendar_event_id(events) {
        let span = project_event(event, day_start);
        if !span_intersects(&span, day_start, day_end) {
            continue;
        }
        if event.all_day {
            all_day_events.push(event.clone());
        } else {
            timed.push((event, span));
        }
    }

    timed.sort_by_key(|(_, span)| span.start);

    let mut slots: Vec<EventGeometry> = timed
        .iter()
        .map(|(_, span)| {
            let top = day_view.minutes_to_pixels(minutes_between(band_start, span.start));
            EventGeometry::new(top, event_height(span, day_view))
        })
        .collect();

    let column_width = day_view.max_event_width();
    place_in_columns(&mut slots, column_width);
    resolve_overlaps(&mut slots, column_width);

    let events: Vec<PositionedEvent> = timed
        .iter()
        .zip(slots)
        .map(|((event, span), slot)| PositionedEvent {
            event: (*event).clone(),
            top: slot.top,
            height: slot.height,
            left: slot.left,
            width: slot.width,
            original_left: slot.original_left,
            starts_before_day: span.start < day_start,
            ends_after_day: span.effective_end() > day_end,
        })
        .collect();

    tracing::debug!(
        %date,
        timed = events.len(),
        all_day = all_day_events.len(),
        "built day view"
    );

    DayLayout {
        date,
        is_today: date == ctx.today,
        width: if events.is_empty() { 0.0 } else { day_view.event_width },
        events,
        all_day_events,
    }
}

pub fn day_view_height(config: &Config) -> f64 {
    let day_view = &config.day_view;
    let minutes = (day_view.end - day_view.start).num_minutes() as f64;
    minutes * day_view.hour_height() / 60.0 + 3.0
}

fn event_height(span: &ProjectedEventPeriod, day_view: &DayViewConfig) -> f64 {
    match span.end {
        Some(end) if end != span.start => day_view.minutes_to_pixels(minutes_between(span.start, end)),
        _ => day_view.segment_size,
    }
}

fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / 60.0
}
