//! Domain primitives shared by the repositories and services.
//!
//! Status columns are stored as lowercase text; the enums here are the only
//! place that text is parsed, so a row carrying an unknown status surfaces as
//! a decode error instead of leaking through as a free-form string.

pub mod codes;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a stored or supplied status label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind} status '{value}'")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    other => Err(UnknownStatus {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

status_enum! {
    /// Visibility of a course in the public catalog.
    CourseStatus, "course" {
        Active => "active",
        Disabled => "disabled",
    }
}

status_enum! {
    /// Lifecycle of an enrollment. Created `pending`, confirmed when its payment completes.
    EnrollmentStatus, "enrollment" {
        Pending => "pending",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
    }
}

status_enum! {
    /// Lifecycle of a payment. Created `pending`.
    PaymentStatus, "payment" {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
        Refunded => "refunded",
    }
}

/// Formats a timestamp the way SQLite's `CURRENT_TIMESTAMP` does, so values
/// written by the application sort and bucket alongside store-assigned ones.
#[must_use]
pub fn store_timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Role tag attached to an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Admin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_parse_their_own_labels() {
        for status in [CourseStatus::Active, CourseStatus::Disabled] {
            assert_eq!(status.as_str().parse::<CourseStatus>(), Ok(status));
        }
        assert_eq!(
            "refunded".parse::<PaymentStatus>(),
            Ok(PaymentStatus::Refunded)
        );
        assert_eq!(
            "confirmed".parse::<EnrollmentStatus>(),
            Ok(EnrollmentStatus::Confirmed)
        );
    }

    #[test]
    fn unknown_status_reports_kind_and_value() {
        let err = "archived".parse::<CourseStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid course status 'archived'");
    }

    #[test]
    fn store_timestamp_matches_sqlite_layout() {
        let at = chrono::DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        assert_eq!(store_timestamp(at), "2025-03-04 05:06:07");
    }

    #[test]
    fn statuses_serialize_lowercase() {
        let json = serde_json::to_string(&PaymentStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        let role = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(role, "\"admin\"");
    }
}
