use std::{
    collections::BTreeMap,
    env,
    io::{self, Write},
    path::PathBuf,
    process::{Command, Stdio},
    sync::Arc,
};

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;

use calgrid::{
    app::{CalendarState, CalendarView, ViewType},
    calendar::{CalendarEvent, project_event},
    storage::{
        config::Config,
        templates::{FsTemplateSource, HttpTemplateSource, LocationTemplateSource, load_templates},
    },
};

use crate::sample_events::add_sample_events;

pub const USAGE: &str = "Usage: calgrid [--view year|month|week|week-with-times|day] [--date YYYY/MM/DD] \
[--events FILE.json] [--config FILE.toml] [--sample] [--agenda]";

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub view: ViewType,
    pub date: NaiveDate,
    pub events_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub sample: bool,
    pub agenda: bool,
}

#[derive(Serialize)]
struct RenderOutput {
    #[serde(flatten)]
    view: CalendarView,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    templates: BTreeMap<String, String>,
}

pub fn parse_cli_mode() -> Result<Option<CliOptions>, String> {
    parse_args(env::args().skip(1), Local::now().date_naive())
}

pub fn parse_args<I>(args: I, today: NaiveDate) -> Result<Option<CliOptions>, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions {
        view: ViewType::default(),
        date: today,
        events_path: None,
        config_path: None,
        sample: false,
        agenda: false,
    };
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--view" => {
                let value = next_value(&mut args, &arg)?;
                options.view = value.parse().map_err(|e| format!("{}", e))?;
            }
            "--date" => {
                let value = next_value(&mut args, &arg)?;
                options.date = NaiveDate::parse_from_str(&value, "%Y/%m/%d")
                    .map_err(|_| format!("Invalid date '{}'. Use YYYY/MM/DD.", value))?;
            }
            "--events" => options.events_path = Some(PathBuf::from(next_value(&mut args, &arg)?)),
            "--config" => options.config_path = Some(PathBuf::from(next_value(&mut args, &arg)?)),
            "--sample" => options.sample = true,
            "--agenda" => options.agenda = true,
            "--help" => return Ok(None),
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    Ok(Some(options))
}

fn next_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, String> {
    args.next()
        .filter(|value| !value.starts_with("--"))
        .ok_or_else(|| format!("Missing value for {}", flag))
}

pub async fn run(options: CliOptions) -> anyhow::Result<()> {
    let config = match &options.config_path {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::load_or_create()?,
    };

    let mut state = CalendarState::new(config)
        .with_view(options.view)
        .with_view_date(options.date);

    if let Some(path) = &options.events_path {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        state.events = serde_json::from_str::<Vec<CalendarEvent>>(&raw)
            .with_context(|| format!("parsing events from {}", path.display()))?;
        tracing::info!("Loaded {} events from {}", state.events.len(), path.display());
    }

    if options.sample {
        add_sample_events(&mut state);
    }

    if options.agenda {
        let agenda = format_agenda_text(&state);
        return display_with_pager(&agenda).context("showing agenda");
    }

    let templates = if state.config.templates.locations.is_empty() {
        BTreeMap::new()
    } else {
        let source = LocationTemplateSource::new(
            FsTemplateSource::new(Config::config_dir()),
            HttpTemplateSource::new(),
        );
        load_templates(Arc::new(source), &state.config.templates.locations).await?
    };

    let output = RenderOutput {
        view: state.render(),
        templates,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn format_agenda_text(state: &CalendarState) -> String {
    let ctx = state.context();
    let long_date = ctx.format(state.view_date.and_time(NaiveTime::MIN), "EEEE, MMMM d, yyyy");
    let mut lines = vec![format!("Agenda – {}", long_date), String::new()];

    let events = state.agenda();
    if events.is_empty() {
        lines.push("No events scheduled.".to_string());
    } else {
        for event in events {
            lines.push(format!("- {}", build_agenda_line(state, event)));
        }
    }

    lines.join("\n")
}

fn build_agenda_line(state: &CalendarState, event: &CalendarEvent) -> String {
    let ctx = state.context();
    let time_format = state.config.formatting.date_formats().time;
    let span = project_event(event, state.view_date.and_time(NaiveTime::MIN));

    let time_label = if event.all_day {
        "All Day".to_string()
    } else {
        match span.end {
            Some(end) => format!("{}-{}", ctx.format(span.start, &time_format), ctx.format(end, &time_format)),
            None => ctx.format(span.start, &time_format),
        }
    };

    format!("{:<13} {}", time_label, plain_title(&event.title))
}

fn plain_title(title: &str) -> String {
    html2text::from_read(title.as_bytes(), 200).trim().to_string()
}

fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let Some(cmd) = parts.next() else {
        print!("{text}");
        return Ok(());
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd).args(&args).stdin(Stdio::piped()).spawn() {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(e) => {
            tracing::warn!("Pager {} unavailable: {}", cmd, e);
            print!("{text}");
        }
    }

    Ok(())
}
