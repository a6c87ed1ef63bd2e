//! Field types shared by the document models.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use mongodb::bson::{oid::ObjectId, Bson};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Key of the store-assigned identifier in every document.
pub const ID_FIELD: &str = "_id";

/// Store-assigned document identifier, exposed to clients as a 24-hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(ObjectId);

impl RecordId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parse an identifier supplied by a client.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        ObjectId::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| AppError::Validation(format!("Invalid id: {}", raw)))
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Native ObjectIds come from the store, hex strings from clients
        match Bson::deserialize(deserializer)? {
            Bson::ObjectId(oid) => Ok(Self(oid)),
            Bson::String(raw) => ObjectId::parse_str(raw.trim())
                .map(Self)
                .map_err(|_| D::Error::custom(format!("invalid id: {}", raw))),
            other => Err(D::Error::custom(format!(
                "expected an id, found {:?}",
                other.element_type()
            ))),
        }
    }
}

/// Naive layouts accepted as UTC, including what `datetime-local` inputs send.
const NAIVE_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// When a post closes.
///
/// Recognized dates are normalized to `YYYY-MM-DDTHH:MM:SS.mmmZ`. The fixed
/// width keeps the store's lexical sort on the stored string identical to
/// chronological order. Anything else is kept exactly as submitted.
#[derive(Debug, Clone)]
pub enum Deadline {
    At(DateTime<Utc>),
    /// Text that is not a recognizable date.
    Unparsed(String),
    /// A non-text value such as a number.
    Other(Value),
}

impl Deadline {
    /// Accepts RFC 3339, naive date-times (as UTC) and plain `YYYY-MM-DD`
    /// dates (midnight UTC). Other text is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        Self::parse_date(raw.trim()).map_or_else(|| Self::Unparsed(raw.to_string()), Self::At)
    }

    fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&Utc));
        }
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(at.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|at| at.and_utc())
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Self::At(_))
    }

    // Numbers sort before text, text before anything else
    fn rank(&self) -> u8 {
        match self {
            Self::Other(Value::Number(_)) => 0,
            Self::At(_) | Self::Unparsed(_) => 1,
            Self::Other(_) => 2,
        }
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Unparsed(raw) => f.write_str(raw),
            Self::Other(value) => write!(f, "{}", value),
        }
    }
}

impl Ord for Deadline {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Other(Value::Number(a)), Self::Other(Value::Number(b))) => {
                let a = a.as_f64().unwrap_or(f64::NAN);
                let b = b.as_f64().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
            _ => self
                .rank()
                .cmp(&other.rank())
                .then_with(|| self.to_string().cmp(&other.to_string())),
        }
    }
}

impl PartialOrd for Deadline {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Deadline {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Deadline {}

impl Serialize for Deadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::At(_) => serializer.collect_str(self),
            Self::Unparsed(raw) => serializer.serialize_str(raw),
            Self::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Deadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Bson::deserialize(deserializer)? {
            Bson::String(raw) => Deadline::parse(&raw),
            Bson::DateTime(at) => match Utc.timestamp_millis_opt(at.timestamp_millis()).single() {
                Some(at) => Self::At(at),
                None => Self::Other(Bson::DateTime(at).into_relaxed_extjson()),
            },
            other => Self::Other(other.into_relaxed_extjson()),
        })
    }
}

/// Coerce a client-supplied volunteer count to a non-negative integer.
///
/// Numbers are truncated, strings contribute their leading integer
/// (`"3 people"` is 3). Anything unparseable counts as 0, negatives clamp to 0.
pub fn coerce_volunteer_need(value: &Value) -> i64 {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    };
    parsed.unwrap_or(0).max(0)
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

pub(crate) fn volunteer_need<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_volunteer_need(&value))
}

pub(crate) fn optional_volunteer_need<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    volunteer_need(deserializer).map(Some)
}

/// Drop any client-supplied identifier so a payload can never retarget a document.
pub fn strip_identity(extra: &mut Map<String, Value>) {
    extra.remove(ID_FIELD);
}
