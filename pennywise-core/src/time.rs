//! Time utilities: an injectable clock, days left in the month, and feed
//! date labels.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Clock abstracts access to the current date so the budget stays
/// deterministic in tests.
pub trait Clock {
    /// The user's local calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the user's timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Parse an IANA name like "Europe/London".
    pub fn from_name(tz: &str) -> Option<Self> {
        tz.parse::<Tz>().ok().map(Self::new)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// A clock pinned to one date, for tests and replays of cached data
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}

/// How the number of days remaining in the month is counted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MonthLength {
    /// `29 - day_of_month`, regardless of the real month length. Goes to
    /// zero or below from the 29th onwards.
    #[serde(rename = "fixed-29")]
    Fixed29,
    /// `last_day_of_month - day_of_month + 1`; today counts, so never zero.
    #[default]
    #[serde(rename = "calendar")]
    Calendar,
}

impl MonthLength {
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        let day = today.day() as i64;
        match self {
            MonthLength::Fixed29 => 29 - day,
            MonthLength::Calendar => last_day_of_month(today).day() as i64 - day + 1,
        }
    }
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Feed label for a transaction date: "Today", "Yesterday", or e.g.
/// "Saturday, 17 Oct 2026".
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today - Duration::days(1) {
        "Yesterday".to_string()
    } else {
        date.format("%A, %d %b %Y").to_string()
    }
}
