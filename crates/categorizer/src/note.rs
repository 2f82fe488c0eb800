use std::fmt;

use chrono::NaiveTime;

const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteTime {
    Untimed,
    Range { start: NaiveTime, end: NaiveTime },
    /// Written as `+<minutes>` when only the duration is known.
    Offset { minutes: u32 },
}

impl NoteTime {
    pub fn minutes(&self) -> u32 {
        match self {
            Self::Untimed => 0,
            Self::Range { start, end } => {
                let minutes = end.signed_duration_since(*start).num_minutes().unsigned_abs();
                u32::try_from(minutes).unwrap_or(u32::MAX)
            }
            Self::Offset { minutes } => *minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    raw: String,
    time: NoteTime,
    info: String,
}

impl Note {
    /// Parses one line of notes. Blank lines yield `None`; lines without a
    /// recognizable time prefix become untimed notes.
    pub fn parse_line(line: &str) -> Option<Self> {
        let raw = line.trim();
        if raw.is_empty() {
            return None;
        }

        let (time, info) = parse_offset(raw)
            .or_else(|| parse_range(raw))
            .unwrap_or_else(|| (NoteTime::Untimed, raw.to_string()));

        Some(Self {
            raw: raw.to_string(),
            time,
            info,
        })
    }

    /// The trimmed source line. Review rows are labeled with it and manual
    /// assignments refer back to it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn time(&self) -> NoteTime {
        self.time
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn minutes(&self) -> u32 {
        self.time.minutes()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time {
            NoteTime::Untimed => write!(f, "{}", self.info),
            NoteTime::Range { start, end } => write!(
                f,
                "{}-{}: {}",
                start.format("%H:%M"),
                end.format("%H:%M"),
                self.info
            ),
            NoteTime::Offset { minutes } => write!(f, "+{minutes}: {}", self.info),
        }
    }
}

fn parse_offset(raw: &str) -> Option<(NoteTime, String)> {
    let rest = raw.strip_prefix('+')?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let minutes = rest[..digits_end].parse::<u32>().ok()?;
    let info = rest[digits_end..].trim_start_matches(':').trim();
    Some((NoteTime::Offset { minutes }, info.to_string()))
}

fn parse_range(raw: &str) -> Option<(NoteTime, String)> {
    let (prefix, info) = raw
        .split_once(char::is_whitespace)
        .unwrap_or((raw, ""));
    let prefix = prefix.strip_suffix(':').unwrap_or(prefix);
    let (start, end) = prefix.split_once('-')?;
    let start = parse_clock(start.trim())?;
    let end = parse_clock(end.trim())?;
    Some((NoteTime::Range { start, end }, info.trim().to_string()))
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}
