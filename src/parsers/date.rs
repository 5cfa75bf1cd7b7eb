use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Formats accepted for transaction timestamps, tried in order.
///
/// The service reports US-style local dates such as `2/1/2026 12:00 AM`.
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%m/%d/%Y"];

/// Point in time of a transaction, in the service's local wall-clock time.
///
/// Unparseable strings become [`TransactionDate::Invalid`] instead of an
/// error; such transactions stay listed but are left out of every
/// time-based aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionDate {
    Valid(NaiveDateTime),
    Invalid,
}

impl TransactionDate {
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            TransactionDate::Valid(dt) => Some(*dt),
            TransactionDate::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TransactionDate::Valid(_))
    }
}

impl From<NaiveDateTime> for TransactionDate {
    fn from(value: NaiveDateTime) -> Self {
        TransactionDate::Valid(value)
    }
}

/// Parse a locale-formatted date (`M/D/YYYY`, optional time with AM/PM).
pub fn parse_date(raw: &str) -> TransactionDate {
    let s = raw.trim();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return TransactionDate::Valid(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return TransactionDate::Valid(date.and_time(chrono::NaiveTime::MIN));
        }
    }

    TransactionDate::Invalid
}

// -----------------------------------------------------------------------------
// Testes
// -----------------------------------------------------------------------------
