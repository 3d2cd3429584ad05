//! Core types for flowcheck

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Credentials exchanged for a token at the auth endpoint.
///
/// A fixed pair; only ever used to obtain a [`Token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    /// The booking service's well-known demo credentials.
    fn default() -> Self {
        Self::new("admin", "password123")
    }
}

/// Opaque short-lived credential proving prior authentication.
///
/// Attached to mutating requests via a `Cookie: token=<value>` header.
/// Non-empty by construction; freshness is not tracked (token expiry is
/// reported by the remote service as an ordinary non-2xx status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a token value; returns `None` for an empty string.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `Cookie` header value the booking service expects.
    pub fn cookie(&self) -> String {
        format!("token={}", self.0)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A full booking record as the remote service stores it.
///
/// Updates are wholesale: read the record, modify a field, `PUT` the
/// entire record back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: i64,
    pub depositpaid: bool,
    pub bookingdates: BookingDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDates {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

/// One entry of the booking collection endpoint.
///
/// The collection lists ids only; the full record is fetched per id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub bookingid: u32,
}

/// The form-case record: entered via form fields, rendered as one table
/// row. All values are kept as the strings typed into the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub user_email: String,
    pub age: String,
    pub salary: String,
    pub department: String,
}

impl Person {
    /// The values as they appear in the table row, in column order.
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.first_name,
            &self.last_name,
            &self.age,
            &self.user_email,
            &self.salary,
            &self.department,
        ]
    }
}
