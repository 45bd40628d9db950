use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormatterMode {
    #[default]
    Angular,
    Native,
}

impl FromStr for FormatterMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "angular" => Ok(FormatterMode::Angular),
            "native" | "moment" => Ok(FormatterMode::Native),
            other => Err(EngineError::Configuration(format!(
                "Unknown date formatter: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for FormatterMode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FormatterMode> for String {
    fn from(value: FormatterMode) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FormatterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatterMode::Angular => f.write_str("angular"),
            FormatterMode::Native => f.write_str("native"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateFormats {
    pub hour: String,
    pub day: String,
    pub month: String,
    pub week_day: String,
    pub time: String,
    pub datetime: String,
}

impl DateFormats {
    pub fn for_mode(mode: FormatterMode) -> Self {
        match mode {
            FormatterMode::Angular => Self {
                hour: "ha".to_string(),
                day: "d MMM".to_string(),
                month: "MMMM".to_string(),
                week_day: "EEEE".to_string(),
                time: "HH:mm".to_string(),
                datetime: "MMM d, h:mm a".to_string(),
            },
            FormatterMode::Native => Self {
                hour: "ha".to_string(),
                day: "D MMM".to_string(),
                month: "MMMM".to_string(),
                week_day: "dddd".to_string(),
                time: "HH:mm".to_string(),
                datetime: "MMM D, h:mm a".to_string(),
            },
        }
    }
}

pub fn format_date(datetime: NaiveDateTime, pattern: &str, mode: FormatterMode) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(end) = literal_end(&chars, i, mode) {
            push_literal(&mut out, &chars[i + 1..end], mode);
            i = end + 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        if mode == FormatterMode::Native && c == 'D' && run == 1 && chars.get(i + 1) == Some(&'o') {
            out.push_str(&ordinal(datetime.day()));
            i += 2;
            continue;
        }

        let token: String = chars[i..i + run].iter().collect();
        match mode {
            FormatterMode::Angular => push_angular(&mut out, datetime, &token),
            FormatterMode::Native => push_native(&mut out, datetime, &token),
        }
        i += run;
    }

    out
}

fn literal_end(chars: &[char], start: usize, mode: FormatterMode) -> Option<usize> {
    let (open, close) = match mode {
        FormatterMode::Angular => ('\'', '\''),
        FormatterMode::Native => ('[', ']'),
    };
    if chars[start] != open {
        return None;
    }
    chars[start + 1..]
        .iter()
        .position(|c| *c == close)
        .map(|offset| start + 1 + offset)
}

fn push_literal(out: &mut String, text: &[char], mode: FormatterMode) {
    if mode == FormatterMode::Angular && text.is_empty() {
        out.push('\'');
        return;
    }
    out.extend(text.iter());
}

fn push_angular(out: &mut String, dt: NaiveDateTime, token: &str) {
    let spec = match token {
        "yyyy" => "%Y",
        "yy" => "%y",
        "y" => "%Y",
        "MMMM" => "%B",
        "MMM" => "%b",
        "MM" => "%m",
        "M" => "%-m",
        "dd" => "%d",
        "d" => "%-d",
        "EEEE" => "%A",
        "EEE" => "%a",
        "HH" => "%H",
        "H" => "%-H",
        "hh" => "%I",
        "h" => "%-I",
        "mm" => "%M",
        "m" => "%-M",
        "ss" => "%S",
        "s" => "%-S",
        "a" => "%p",
        _ => {
            out.push_str(token);
            return;
        }
    };
    out.push_str(&dt.format(spec).to_string());
}

fn push_native(out: &mut String, dt: NaiveDateTime, token: &str) {
    let spec = match token {
        "YYYY" => "%Y",
        "YY" => "%y",
        "MMMM" => "%B",
        "MMM" => "%b",
        "MM" => "%m",
        "M" => "%-m",
        "DD" => "%d",
        "D" => "%-d",
        "dddd" => "%A",
        "ddd" => "%a",
        "dd" => {
            out.extend(dt.format("%a").to_string().chars().take(2));
            return;
        }
        "d" => "%w",
        "HH" => "%H",
        "H" => "%-H",
        "hh" => "%I",
        "h" => "%-I",
        "mm" => "%M",
        "m" => "%-M",
        "ss" => "%S",
        "s" => "%-S",
        "A" => "%p",
        "a" => "%P",
        _ => {
            out.push_str(token);
            return;
        }
    };
    out.push_str(&dt.format(spec).to_string());
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}
