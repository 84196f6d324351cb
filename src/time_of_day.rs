use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const MINUTES_PER_HOUR: u16 = 60;
pub const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

static DISPLAY_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*(AM|PM)$").expect("Pattern is valid.")
});

static TWENTY_FOUR_HOUR_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2})$").expect("Pattern is valid."));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Unrecognized time format {0:?}")]
    Format(String),

    #[error("Hour {0} is out of range")]
    Hour(u16),

    #[error("Minute {0} is out of range")]
    Minute(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meridiem {
    Am,
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => f.write_str("AM"),
            Meridiem::Pm => f.write_str("PM"),
        }
    }
}

/// Time as entered in the picker: hour `1..=12`, minute and AM/PM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawClockTime")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
    meridiem: Meridiem,
}

#[derive(Deserialize)]
struct RawClockTime {
    hour: u8,
    minute: u8,
    meridiem: Meridiem,
}

impl TryFrom<RawClockTime> for ClockTime {
    type Error = TimeParseError;

    fn try_from(raw: RawClockTime) -> Result<Self, Self::Error> {
        ClockTime::new(raw.hour, raw.minute, raw.meridiem)
    }
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8, meridiem: Meridiem) -> Result<Self, TimeParseError> {
        if !(1..=12).contains(&hour) {
            return Err(TimeParseError::Hour(hour.into()));
        }
        if minute > 59 {
            return Err(TimeParseError::Minute(minute.into()));
        }

        Ok(Self {
            hour,
            minute,
            meridiem,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn meridiem(&self) -> Meridiem {
        self.meridiem
    }

    pub fn to_time_of_day(self) -> TimeOfDay {
        let hour = match (self.meridiem, self.hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Am, hour) => hour,
            (Meridiem::Pm, 12) => 12,
            (Meridiem::Pm, hour) => hour + 12,
        };

        TimeOfDay(u16::from(hour) * MINUTES_PER_HOUR + u16::from(self.minute))
    }
}

impl From<ClockTime> for TimeOfDay {
    fn from(value: ClockTime) -> Self {
        value.to_time_of_day()
    }
}

/// Minutes since midnight.
///
/// Ordering matches comparing the zero-padded `HH:MM` form lexicographically,
/// which is what every block comparison relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, TimeParseError> {
        if hour > 23 {
            return Err(TimeParseError::Hour(hour.into()));
        }
        if minute > 59 {
            return Err(TimeParseError::Minute(minute.into()));
        }

        Ok(Self(u16::from(hour) * MINUTES_PER_HOUR + u16::from(minute)))
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u8 {
        (self.0 / MINUTES_PER_HOUR) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.0 % MINUTES_PER_HOUR) as u8
    }

    pub fn to_clock_time(self) -> ClockTime {
        let (hour, meridiem) = match self.hour() {
            0 => (12, Meridiem::Am),
            hour @ 1..=11 => (hour, Meridiem::Am),
            12 => (12, Meridiem::Pm),
            hour => (hour - 12, Meridiem::Pm),
        };

        ClockTime {
            hour,
            minute: self.minute(),
            meridiem,
        }
    }

    pub fn to_24h_string(&self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    pub fn parse_24h(value: &str) -> Result<Self, TimeParseError> {
        let captures = TWENTY_FOUR_HOUR_TIME
            .captures(value.trim())
            .ok_or_else(|| TimeParseError::Format(value.to_string()))?;

        let hour = parse_component(&captures[1], value)?;
        let minute = parse_component(&captures[2], value)?;

        Self::from_hm(hour, minute)
    }

    /// Formats as the planning service does: `9:05 AM`, no leading zero on the hour.
    pub fn format_display(&self) -> String {
        let clock = self.to_clock_time();
        format!("{}:{:02} {}", clock.hour, clock.minute, clock.meridiem)
    }

    /// Parses `H:MM AM|PM`, case-insensitive.
    pub fn parse_display(value: &str) -> Result<Self, TimeParseError> {
        let captures = DISPLAY_TIME
            .captures(value.trim())
            .ok_or_else(|| TimeParseError::Format(value.to_string()))?;

        let hour = parse_component(&captures[1], value)?;
        let minute = parse_component(&captures[2], value)?;
        let meridiem = if captures[3].eq_ignore_ascii_case("AM") {
            Meridiem::Am
        } else {
            Meridiem::Pm
        };

        ClockTime::new(hour, minute, meridiem).map(ClockTime::to_time_of_day)
    }
}

fn parse_component(digits: &str, original: &str) -> Result<u8, TimeParseError> {
    digits
        .parse()
        .map_err(|_| TimeParseError::Format(original.to_string()))
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_display())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_display(s)
    }
}

impl From<chrono::NaiveTime> for TimeOfDay {
    fn from(value: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        Self((value.hour() * 60 + value.minute()) as u16)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format_display())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse_display(&raw).map_err(serde::de::Error::custom)
    }
}
