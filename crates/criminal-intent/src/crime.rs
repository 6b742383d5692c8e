//! Record model for criminal-intent.
//!
//! A [`Crime`] is the persisted record. A [`CrimeFormData`] is the editable
//! subset used while a record is being written or changed, before it is handed
//! to the storage gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Title shown for records saved without one.
pub const UNTITLED: &str = "Untitled Crime";

/// Message returned when a draft is submitted without a title.
pub const MISSING_TITLE: &str = "Please enter a title for the crime";

/// A single incident record.
///
/// Field names are camel-cased on the wire to stay compatible with existing
/// blobs. Dates are written as RFC 3339 strings in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crime {
    /// Opaque unique identifier, immutable once assigned.
    pub id: String,

    /// Short headline.
    pub title: String,

    /// Free-text description.
    #[serde(default)]
    pub details: String,

    /// When the incident happened.
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,

    /// Whether the incident has been resolved.
    #[serde(default)]
    pub is_solved: bool,

    /// Locator of an externally stored photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,

    /// Set once, the first time the record is stored.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    /// Refreshed every time the record is stored.
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Crime {
    /// Build a record from a draft.
    ///
    /// Both timestamps are set to `now`; the storage gateway restamps them on
    /// save anyway.
    #[must_use]
    pub fn from_form(id: impl Into<String>, form: CrimeFormData, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: form.title,
            details: form.details,
            date: form.date,
            is_solved: form.is_solved,
            photo_uri: form.photo_uri,
            created_at: now,
            updated_at: now,
        }
    }

    /// The title to show in lists, falling back to [`UNTITLED`].
    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// Check if a photo is attached.
    #[must_use]
    pub fn has_photo(&self) -> bool {
        self.photo_uri.is_some()
    }
}

/// The user-editable fields of a [`Crime`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeFormData {
    /// Short headline.
    pub title: String,
    /// Free-text description.
    pub details: String,
    /// When the incident happened.
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    /// Whether the incident has been resolved.
    pub is_solved: bool,
    /// Locator of an externally stored photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
}

impl Default for CrimeFormData {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl CrimeFormData {
    /// An empty, unsolved draft dated `date`.
    #[must_use]
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            title: String::new(),
            details: String::new(),
            date,
            is_solved: false,
            photo_uri: None,
        }
    }

    /// Check that the draft can be submitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the title is blank.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation(MISSING_TITLE));
        }
        Ok(())
    }

    /// Strip surrounding whitespace from the title and details.
    #[must_use]
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.details = self.details.trim().to_string();
        self
    }
}

impl From<&Crime> for CrimeFormData {
    fn from(crime: &Crime) -> Self {
        Self {
            title: crime.title.clone(),
            details: crime.details.clone(),
            date: crime.date,
            is_solved: crime.is_solved,
            photo_uri: crime.photo_uri.clone(),
        }
    }
}

/// Order records by incident date, most recent first.
pub fn sort_newest_first(crimes: &mut [Crime]) {
    crimes.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Render an incident date with a `chrono` format string.
#[must_use]
pub fn format_date(date: &DateTime<Utc>, format: &str) -> String {
    date.format(format).to_string()
}

/// Parse a user-supplied date.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the input is not a recognized date.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    timestamp::parse(input).ok_or_else(|| Error::InvalidDate {
        input: input.to_string(),
    })
}

/// Serde adapter for record timestamps.
///
/// Writes RFC 3339 in UTC. Reads RFC 3339 with any offset, a zone-less
/// date-time (taken as UTC), or a bare `YYYY-MM-DD` (midnight UTC).
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(input: &str) -> Option<DateTime<Utc>> {
        let input = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
