//! Parser for state-issued claim transaction identifiers ("SWA XIDs").
//!
//! Some issuers embed a local-time timestamp in the first two hyphen
//! segments (`YYYYMMDD-HHMMSS-...`). The timestamp is only extracted when
//! the issuer's timezone is known; malformed or unparseable digits degrade
//! to an absent timestamp rather than an error.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::fmt;

/// Segment lengths of the documented long-form identifier.
const LONG_FORM_SEGMENTS: [usize; 4] = [8, 6, 7, 9];

/// Issuer code → local timezone table, owned by the parser.
///
/// The default table carries the issuers with documented timestamped
/// identifiers; callers can supply their own for other deployments.
#[derive(Clone, Debug)]
pub struct SwaTimezones {
    zones: HashMap<String, Tz>,
}

impl SwaTimezones {
    pub fn empty() -> Self {
        Self {
            zones: HashMap::new(),
        }
    }

    pub fn insert(&mut self, swa_code: impl Into<String>, tz: Tz) {
        self.zones.insert(swa_code.into(), tz);
    }

    pub fn get(&self, swa_code: &str) -> Option<Tz> {
        self.zones.get(swa_code).copied()
    }
}

impl Default for SwaTimezones {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("AR", chrono_tz::America::Chicago);
        table
    }
}

impl FromIterator<(String, Tz)> for SwaTimezones {
    fn from_iter<I: IntoIterator<Item = (String, Tz)>>(iter: I) -> Self {
        Self {
            zones: iter.into_iter().collect(),
        }
    }
}

/// A parsed transaction identifier: the raw string, its issuing agency
/// code, and the embedded timestamp when one could be resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwaXid {
    raw: String,
    swa_code: String,
    datetime: Option<DateTime<Utc>>,
}

impl SwaXid {
    /// Parses an identifier using the default issuer timezone table.
    pub fn new(raw: impl Into<String>, swa_code: impl Into<String>) -> Self {
        Self::with_timezones(raw, swa_code, &SwaTimezones::default())
    }

    /// Parses an identifier against an explicit issuer timezone table.
    pub fn with_timezones(
        raw: impl Into<String>,
        swa_code: impl Into<String>,
        timezones: &SwaTimezones,
    ) -> Self {
        let raw = raw.into();
        let swa_code = swa_code.into();
        let datetime = timezones
            .get(&swa_code)
            .and_then(|tz| extract_timestamp(&raw, tz));
        Self {
            raw,
            swa_code,
            datetime,
        }
    }

    pub fn swa_code(&self) -> &str {
        &self.swa_code
    }

    /// The embedded timestamp in UTC, if the issuer was known and the
    /// digits formed a valid local date/time.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.datetime
    }

    /// UTC ISO-8601 rendering of the embedded timestamp, if present.
    pub fn as_isoformat(&self) -> Option<String> {
        self.datetime.map(|dt| dt.to_rfc3339())
    }

    /// Structural shape check, independent of the issuer and of whether
    /// the timestamp digits form a valid date.
    ///
    /// An identifier whose first two segments are 8- and 6-digit runs
    /// claims to embed a timestamp, and must then be the full documented
    /// long form (four all-digit segments of lengths 8-6-7-9). Anything
    /// without that timestamp-shaped prefix passes.
    pub fn format_ok(&self) -> bool {
        let segments: Vec<&str> = self.raw.split('-').collect();
        let timestamp_shaped =
            segments.len() >= 2 && digit_run(segments[0], 8) && digit_run(segments[1], 6);
        if !timestamp_shaped {
            return true;
        }
        segments.len() == LONG_FORM_SEGMENTS.len()
            && segments
                .iter()
                .zip(LONG_FORM_SEGMENTS)
                .all(|(segment, len)| digit_run(segment, len))
    }
}

impl fmt::Display for SwaXid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn digit_run(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Interprets the leading `YYYYMMDD-HHMMSS` segments as a local time in
/// `tz` and converts to UTC. Returns `None` for any shape or calendar
/// violation (e.g. month 13, hour 99) and for nonexistent local times.
fn extract_timestamp(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let mut segments = raw.splitn(3, '-');
    let date = segments.next()?;
    let time = segments.next()?;
    if !digit_run(date, 8) || !digit_run(time, 6) {
        return None;
    }

    let year: i32 = date[0..4].parse().ok()?;
    let month: u32 = date[4..6].parse().ok()?;
    let day: u32 = date[6..8].parse().ok()?;
    let hour: u32 = time[0..2].parse().ok()?;
    let minute: u32 = time[2..4].parse().ok()?;
    let second: u32 = time[4..6].parse().ok()?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
