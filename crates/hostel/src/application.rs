//! Pieces shared by the leave and visitor request workflows.
//!
//! Both workflows follow the same life cycle: a request is submitted as
//! [`Status::Pending`] and a warden or faculty member moves it to
//! [`Status::Approved`] or [`Status::Rejected`] exactly once.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format used on every form: `DD/MM/YYYY`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Which workflow an application belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationKind {
    /// Student leave of absence.
    Leave,
    /// Visitor entry request.
    Visitor,
}

impl fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Leave => "leave",
            Self::Visitor => "visitor",
        })
    }
}

/// Where an application is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Waiting for a decision.
    #[default]
    Pending,
    /// Accepted.
    Approved,
    /// Turned down.
    Rejected,
}

impl Status {
    /// The stored form of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(Error::internal(format!("unknown application status: {other}"))),
        }
    }
}

/// The outcome chosen for a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Move to [`Status::Approved`].
    Approve,
    /// Move to [`Status::Rejected`].
    Reject,
}

impl Decision {
    /// Status the application ends up in.
    #[must_use]
    pub fn status(self) -> Status {
        match self {
            Self::Approve => Status::Approved,
            Self::Reject => Status::Rejected,
        }
    }
}

/// Who decided an application, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Processing {
    /// When the decision was recorded.
    pub processed_at: DateTime<Utc>,
    /// Identifier of the person who decided.
    pub processed_by: String,
}

/// Check that an application may still be decided, and build the processing
/// stamp for the decision.
///
/// # Errors
///
/// Returns `AlreadyProcessed` if `current` is not pending, and `MissingField`
/// if `processed_by` is blank.
pub(crate) fn decide(
    kind: ApplicationKind,
    id: i64,
    current: Status,
    processed_by: &str,
    at: DateTime<Utc>,
) -> Result<Processing> {
    if current != Status::Pending {
        return Err(Error::AlreadyProcessed {
            kind,
            id,
            status: current,
        });
    }
    Ok(Processing {
        processed_at: at,
        processed_by: required("processed_by", processed_by)?,
    })
}

/// Trim a form field, rejecting blank input.
///
/// # Errors
///
/// Returns `MissingField` naming `field` when the value is blank.
pub fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::missing_field(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse a strict `DD/MM/YYYY` date with a year from 2000 to 2099.
///
/// Day and month must be zero padded and name a real calendar day.
///
/// # Errors
///
/// Returns `InvalidDate` naming `field` otherwise.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let invalid = || Error::InvalidDate {
        field,
        value: value.to_string(),
    };

    let bytes = trimmed.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit())
        && &trimmed[6..8] == "20";
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

/// Format a date the way the forms show it.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [Status::Pending, Status::Approved, Status::Rejected] {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
        assert!("cancelled".parse::<Status>().is_err());
        assert_eq!(Status::default(), Status::Pending);
    }

    #[test]
    fn test_status_display_pads() {
        assert_eq!(format!("[{:<9}]", Status::Approved), "[approved ]");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Approved).unwrap(), "\"approved\"");
    }

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required("reason", "  fever ").unwrap(), "fever");
        let err = required("reason", " \t").unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "reason" }));
    }

    #[test]
    fn test_parse_date_accepts_padded_dates_in_2000s() {
        let date = parse_date("start_date", "05/03/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert!(parse_date("start_date", "31/12/2099").is_ok());
        assert!(parse_date("start_date", " 01/01/2000 ").is_ok());
    }

    #[test]
    fn test_parse_date_rejects_bad_input() {
        for bad in [
            "5/3/2024",
            "2024-03-05",
            "05/03/1999",
            "05/03/2100",
            "32/01/2024",
            "05/13/2024",
            "30/02/2024",
            "0a/03/2024",
            "",
        ] {
            let err = parse_date("end_date", bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidDate { field: "end_date", .. }),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(format_date(date), "09/01/2025");
    }

    #[test]
    fn test_decide_only_from_pending() {
        let now = Utc::now();
        let stamp = decide(ApplicationKind::Leave, 1, Status::Pending, " warden ", now).unwrap();
        assert_eq!(stamp.processed_by, "warden");
        assert_eq!(stamp.processed_at, now);

        let err = decide(ApplicationKind::Visitor, 2, Status::Rejected, "warden", now).unwrap_err();
        assert!(matches!(
            err,
            Error::AlreadyProcessed {
                kind: ApplicationKind::Visitor,
                id: 2,
                status: Status::Rejected,
            }
        ));
    }

    #[test]
    fn test_decide_requires_processor() {
        let err = decide(ApplicationKind::Leave, 1, Status::Pending, "", Utc::now()).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "processed_by" }));
    }

    #[test]
    fn test_decision_status() {
        assert_eq!(Decision::Approve.status(), Status::Approved);
        assert_eq!(Decision::Reject.status(), Status::Rejected);
    }
}
