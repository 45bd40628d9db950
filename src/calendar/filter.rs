use chrono::NaiveDateTime;

use crate::calendar::event::CalendarEvent;
use crate::calendar::recurrence::{ProjectedEventPeriod, project_event};

pub fn intersects(event: &CalendarEvent, period_start: NaiveDateTime, period_end: NaiveDateTime) -> bool {
    let projected = project_event(event, period_start);
    span_intersects(&projected, period_start, period_end)
}

// Boundary instants count: a span that starts on `period_start` or ends on
// `period_end` is inside even when the strict checks miss it.
pub fn span_intersects(
    projected: &ProjectedEventPeriod,
    period_start: NaiveDateTime,
    period_end: NaiveDateTime,
) -> bool {
    let start = projected.start;
    let end = projected.effective_end();

    (start > period_start && start < period_end)
        || (end > period_start && end < period_end)
        || (start <= period_start && end >= period_end)
        || start == period_start
        || end == period_end
}

pub fn filter_in_period<'a, I>(
    events: I,
    period_start: NaiveDateTime,
    period_end: NaiveDateTime,
) -> Vec<&'a CalendarEvent>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    events
        .into_iter()
        .filter(|event| intersects(event, period_start, period_end))
        .collect()
}
