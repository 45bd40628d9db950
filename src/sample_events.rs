use chrono::{Datelike, Days, NaiveDate};
use calgrid::{
    app::CalendarState,
    calendar::{CalendarEvent, EventAction, EventColor, RecursOn},
};

pub fn add_sample_events(state: &mut CalendarState) {
    let day = state.view_date;
    let Some(tomorrow) = day.checked_add_days(Days::new(1)) else { return };
    let Some(yesterday) = day.checked_sub_days(Days::new(1)) else { return };

    let timed = vec![
        ("Morning Standup", day, (9, 0), (9, 30)),
        ("<b>Design review</b>", day, (9, 15), (10, 45)),
        ("Team Sync", day, (10, 0), (11, 0)),
        ("Code Review", tomorrow, (10, 0), (11, 0)),
        ("Lunch with Team", yesterday, (12, 30), (13, 30)),
    ];

    for (title, date, start, end) in timed {
        let (Some(starts_at), Some(ends_at)) = (
            date.and_hms_opt(start.0, start.1, 0),
            date.and_hms_opt(end.0, end.1, 0),
        ) else {
            continue;
        };

        let mut event = CalendarEvent::new(title, starts_at).with_end(ends_at);
        event.color = Some(EventColor {
            primary: "#1e90ff".to_string(),
            secondary: "#d1e8ff".to_string(),
        });
        state.add_event(event);
    }

    if let Some(starts_at) = yesterday.and_hms_opt(20, 0, 0) {
        let mut overnight = CalendarEvent::new("Release night", starts_at);
        if let Some(ends_at) = day.and_hms_opt(2, 0, 0) {
            overnight = overnight.with_end(ends_at);
        }
        overnight.actions.push(EventAction {
            label: "Edit".to_string(),
            css_class: Some("edit".to_string()),
        });
        state.add_event(overnight);
    }

    if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
        state.add_event(CalendarEvent::new("Company holiday", midnight).with_all_day(true));
    }

    if let Some(anchor) = NaiveDate::from_ymd_opt(2010, day.month0() + 1, 1).and_then(|d| d.and_hms_opt(8, 0, 0)) {
        state.add_event(CalendarEvent::new("Pay rent", anchor).with_recurrence(RecursOn::Month));
    }

    if let Some(birthday) = day.with_year(1990).and_then(|d| d.and_hms_opt(18, 0, 0)) {
        state.add_event(
            CalendarEvent::new("Birthday", birthday)
                .with_recurrence(RecursOn::Year)
                .with_badge(false),
        );
    }

    if let Some(starts_at) = day.and_hms_opt(16, 0, 0) {
        let synced = CalendarEvent::new("Synced call", starts_at).with_calendar_event_id("sample-sync");
        state.add_event(synced.clone());
        state.add_event(synced);
    }
}
