use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    pub starts_at: NaiveDateTime,
    #[serde(default)]
    pub ends_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub color: Option<EventColor>,
    #[serde(default)]
    pub draggable: bool,
    #[serde(default)]
    pub resizable: bool,
    #[serde(default)]
    pub recurs_on: RecursOn,
    #[serde(default)]
    pub calendar_event_id: Option<String>,
    #[serde(default)]
    pub actions: Vec<EventAction>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default = "default_increments_badge_total")]
    pub increments_badge_total: bool,
}

fn default_increments_badge_total() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventColor {
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAction {
    pub label: String,
    #[serde(default)]
    pub css_class: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecursOn {
    #[default]
    None,
    Year,
    Month,
}

impl FromStr for RecursOn {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(RecursOn::None),
            "year" => Ok(RecursOn::Year),
            "month" => Ok(RecursOn::Month),
            other => Err(EngineError::InvalidRecurrenceMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for RecursOn {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecursOn> for String {
    fn from(value: RecursOn) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RecursOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecursOn::None => "none",
            RecursOn::Year => "year",
            RecursOn::Month => "month",
        };
        f.write_str(name)
    }
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, starts_at: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            starts_at,
            ends_at: None,
            color: None,
            draggable: false,
            resizable: false,
            recurs_on: RecursOn::None,
            calendar_event_id: None,
            actions: Vec::new(),
            all_day: false,
            increments_badge_total: true,
        }
    }

    pub fn with_end(mut self, ends_at: NaiveDateTime) -> Self {
        self.ends_at = Some(ends_at);
        self
    }

    pub fn with_recurrence(mut self, recurs_on: RecursOn) -> Self {
        self.recurs_on = recurs_on;
        self
    }

    pub fn with_calendar_event_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_event_id = Some(id.into());
        self
    }

    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn with_badge(mut self, increments_badge_total: bool) -> Self {
        self.increments_badge_total = increments_badge_total;
        self
    }

    pub fn duration_minutes(&self) -> i64 {
        self.ends_at
            .map(|end| (end - self.starts_at).num_minutes())
            .unwrap_or(0)
    }
}

pub fn dedupe_by_calendar_event_id<'a, I>(events: I) -> Vec<&'a CalendarEvent>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    events
        .into_iter()
        .filter(|event| match event.calendar_event_id.as_deref() {
            Some(id) => seen.insert(id),
            None => true,
        })
        .collect()
}

pub fn badge_total(events: &[CalendarEvent]) -> usize {
    events.iter().filter(|e| e.increments_badge_total).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn new_event_does_not_recur() {
        let event = CalendarEvent::new("Standup", at(9, 0));

        assert_eq!(event.recurs_on, RecursOn::None);
        assert!(event.increments_badge_total);
    }

    #[test]
    fn event_duration_calculated_correctly() {
        let event = CalendarEvent::new("Meeting", at(9, 0)).with_end(at(10, 30));

        assert_eq!(event.duration_minutes(), 90);
    }

    #[test]
    fn point_event_has_zero_duration() {
        let event = CalendarEvent::new("Reminder", at(9, 0));

        assert_eq!(event.duration_minutes(), 0);
    }

    #[test]
    fn recurs_on_parses_known_modes() {
        assert_eq!("year".parse::<RecursOn>(), Ok(RecursOn::Year));
        assert_eq!("month".parse::<RecursOn>(), Ok(RecursOn::Month));
        assert_eq!("none".parse::<RecursOn>(), Ok(RecursOn::None));
    }

    #[test]
    fn recurs_on_rejects_unknown_mode() {
        let result = "week".parse::<RecursOn>();

        assert_eq!(
            result,
            Err(EngineError::InvalidRecurrenceMode("week".to_string()))
        );
    }

    #[test]
    fn deserializing_unknown_recurrence_fails() {
        let json = r#"{"title": "x", "startsAt": "2019-03-10T09:00:00", "recursOn": "fortnight"}"#;

        let result: Result<CalendarEvent, _> = serde_json::from_str(json);

        let err = result.unwrap_err().to_string();
        assert!(err.contains("fortnight"));
    }

    #[test]
    fn deserializes_camel_case_event_with_defaults() {
        let json = r#"{
            "title": "<b>Launch</b>",
            "startsAt": "2019-03-10T11:00:00",
            "endsAt": "2019-03-10T19:00:00",
            "recursOn": "year",
            "calendarEventId": "abc"
        }"#;

        let event: CalendarEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.ends_at, Some(at(19, 0)));
        assert_eq!(event.recurs_on, RecursOn::Year);
        assert_eq!(event.calendar_event_id.as_deref(), Some("abc"));
        assert!(event.increments_badge_total);
        assert!(!event.all_day);
    }

    #[test]
    fn dedupe_keeps_first_occurrence_in_order() {
        let events = vec![
            CalendarEvent::new("a", at(9, 0)).with_calendar_event_id("1"),
            CalendarEvent::new("b", at(10, 0)),
            CalendarEvent::new("c", at(11, 0)).with_calendar_event_id("1"),
            CalendarEvent::new("d", at(12, 0)).with_calendar_event_id("2"),
            CalendarEvent::new("e", at(13, 0)),
        ];

        let titles: Vec<&str> = dedupe_by_calendar_event_id(&events)
            .into_iter()
            .map(|e| e.title.as_str())
            .collect();

        assert_eq!(titles, vec!["a", "b", "d", "e"]);
    }

    #[test]
    fn badge_total_skips_opted_out_events() {
        let events = vec![
            CalendarEvent::new("a", at(9, 0)),
            CalendarEvent::new("b", at(10, 0)).with_badge(false),
            CalendarEvent::new("c", at(11, 0)),
        ];

        assert_eq!(badge_total(&events), 2);
    }
}
