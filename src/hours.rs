//! Time expressions in free-text opening hours.
//!
//! The recognised expressions are an enumerated table, [`TIME_PATTERNS`],
//! scanned in precedence order. A later pattern never claims text already
//! matched by an earlier one, so `8:30 PM` is read once as a 12-hour time and
//! not again as the 24-hour `8:30`.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static TWELVE_HOUR_WITH_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([0-9]{1,2}):([0-5][0-9])\s*(AM|PM)\b").expect("time regex is valid")
});
static TWELVE_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([0-9]{1,2})\s*(AM|PM)\b").expect("time regex is valid")
});
static TWENTY_FOUR_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]{1,2}):([0-5][0-9])\b").expect("time regex is valid")
});

/// A textual time-of-day format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePattern {
    /// `H:MM AM/PM`
    TwelveHourWithMinutes,
    /// `H AM/PM`
    TwelveHour,
    /// `H:MM`, 24-hour clock
    TwentyFourHour,
}

/// Recognised patterns in precedence order.
pub const TIME_PATTERNS: [TimePattern; 3] = [
    TimePattern::TwelveHourWithMinutes,
    TimePattern::TwelveHour,
    TimePattern::TwentyFourHour,
];

impl TimePattern {
    fn regex(self) -> &'static Regex {
        match self {
            TimePattern::TwelveHourWithMinutes => &*TWELVE_HOUR_WITH_MINUTES,
            TimePattern::TwelveHour => &*TWELVE_HOUR,
            TimePattern::TwentyFourHour => &*TWENTY_FOUR_HOUR,
        }
    }

    /// Minutes since midnight, or `None` for out-of-range values like `13 PM`.
    fn minutes(self, caps: &Captures<'_>) -> Option<u16> {
        let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u16>().ok());

        match self {
            TimePattern::TwelveHourWithMinutes => {
                twelve_hour(number(1)?, number(2)?, caps.get(3)?.as_str())
            }
            TimePattern::TwelveHour => twelve_hour(number(1)?, 0, caps.get(2)?.as_str()),
            TimePattern::TwentyFourHour => {
                let (hour, minute) = (number(1)?, number(2)?);
                (hour < 24 && minute < 60).then_some(hour * 60 + minute)
            }
        }
    }
}

fn twelve_hour(hour: u16, minute: u16, meridiem: &str) -> Option<u16> {
    if !(1..=12).contains(&hour) || minute >= 60 {
        return None;
    }
    let pm = meridiem.eq_ignore_ascii_case("pm");
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Some(hour * 60 + minute)
}

/// One time expression found in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMatch<'a> {
    pub pattern: TimePattern,
    /// The matched text, verbatim.
    pub text: &'a str,
    /// Byte offset of the match.
    pub start: usize,
    /// Minutes since midnight; `None` when the text is not a real time.
    pub minutes: Option<u16>,
}

/// Find every time expression in `text`, ordered by position.
pub fn scan(text: &str) -> Vec<TimeMatch<'_>> {
    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut found = Vec::new();

    for pattern in TIME_PATTERNS {
        for caps in pattern.regex().captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let (start, end) = (whole.start(), whole.end());
            if claimed.iter().any(|&(s, e)| start < e && s < end) {
                continue;
            }
            claimed.push((start, end));
            found.push(TimeMatch {
                pattern,
                text: whole.as_str(),
                start,
                minutes: pattern.minutes(&caps),
            });
        }
    }

    found.sort_by_key(|m| m.start);
    found
}

/// Latest time of day mentioned in an opening-hours string.
///
/// Opening hours list opening and closing times together, so the largest
/// value is taken as the closing time. `None` means unknown, never midnight.
pub fn extract_latest_closing(hours_text: &str) -> Option<u16> {
    scan(hours_text).into_iter().filter_map(|m| m.minutes).max()
}

/// Format minutes since midnight as `H:MM AM/PM`.
pub fn format_minutes(minutes: u16) -> String {
    let (hour, minute) = (minutes / 60 % 24, minutes % 60);
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display, minute, meridiem)
}
