//! Waitlist records.
//!
//! [`SignupForm`] is what a visitor submits; [`WaitlistEntry`] is what the
//! store persists. The four text fields travel unchanged from one to the
//! other.

use serde::{Deserialize, Serialize};

use crate::error::WaitlistError;

/// Header row of the CSV export.
pub const CSV_HEADER: &str = "ID,Name,Email,Phone,City,Timestamp";

/// The four fields a visitor fills in on the landing page.
///
/// Absent fields decode as empty strings so that [`validate`](Self::validate)
/// reports them by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
}

impl SignupForm {
    /// Check that every field is present.
    ///
    /// A field made only of whitespace counts as missing. Values are never
    /// trimmed or otherwise altered.
    ///
    /// # Errors
    ///
    /// Returns [`WaitlistError::MissingField`] naming the first empty field,
    /// in form order.
    pub fn validate(&self) -> Result<(), WaitlistError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("city", &self.city),
        ];
        match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(WaitlistError::MissingField { field }),
            None => Ok(()),
        }
    }
}

/// One persisted signup.
///
/// Field names match the stored JSON document exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    /// Creation time in milliseconds since the Unix epoch.
    pub id: i64,
    /// Creation time as ISO-8601, e.g. `2024-07-27T10:15:30.123Z`.
    pub timestamp: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
}

impl WaitlistEntry {
    /// Render this entry as one CSV row in header order.
    ///
    /// Values are joined verbatim: a comma inside a field shifts the
    /// remaining columns.
    #[must_use]
    pub fn csv_row(&self) -> String {
        [
            self.id.to_string().as_str(),
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.city.as_str(),
            self.timestamp.as_str(),
        ]
        .join(",")
    }

    /// The calendar date part of [`timestamp`](Self::timestamp), for display.
    ///
    /// Falls back to the raw timestamp when it does not parse.
    #[must_use]
    pub fn display_date(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp).map_or_else(
            |_| self.timestamp.clone(),
            |ts| ts.date_naive().format("%Y-%m-%d").to_string(),
        )
    }
}
