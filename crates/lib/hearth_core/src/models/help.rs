//! Help request models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;
use crate::geo::Located;

/// Lifecycle of a help request. `Pending` is initial; there is no terminal
/// or cancelled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Assigned,
    Confirmed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::Pending,
        RequestStatus::Assigned,
        RequestStatus::Confirmed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Assigned => "assigned",
            RequestStatus::Confirmed => "confirmed",
        }
    }

    /// Status after an assignment, if allowed from `self`.
    ///
    /// Re-assigning an assigned request is allowed and overwrites the
    /// assignee.
    pub fn assign(self) -> Option<Self> {
        match self {
            RequestStatus::Pending | RequestStatus::Assigned => Some(RequestStatus::Assigned),
            RequestStatus::Confirmed => None,
        }
    }

    /// Status after a confirmation, if allowed from `self`.
    pub fn confirm(self) -> Option<Self> {
        match self {
            RequestStatus::Assigned => Some(RequestStatus::Confirmed),
            RequestStatus::Pending | RequestStatus::Confirmed => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "assigned" => Ok(RequestStatus::Assigned),
            "confirmed" => Ok(RequestStatus::Confirmed),
            other => Err(format!("unknown request status: {other}")),
        }
    }
}

/// A help request raised by an elder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: String,
    pub elder_id: String,
    /// Snapshot at creation; not live-tracked.
    pub elder_location: GeoPoint,
    pub title: String,
    pub audio_url: Option<String>,
    pub transcript: String,
    pub status: RequestStatus,
    pub helper_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Located for HelpRequest {
    fn location(&self) -> Option<GeoPoint> {
        Some(self.elder_location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_lifecycle() {
        assert_eq!(RequestStatus::Pending.assign(), Some(RequestStatus::Assigned));
        assert_eq!(RequestStatus::Assigned.assign(), Some(RequestStatus::Assigned));
        assert_eq!(RequestStatus::Confirmed.assign(), None);

        assert_eq!(RequestStatus::Assigned.confirm(), Some(RequestStatus::Confirmed));
        assert_eq!(RequestStatus::Pending.confirm(), None);
        assert_eq!(RequestStatus::Confirmed.confirm(), None);
    }

    #[test]
    fn status_parses_its_own_rendering() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Assigned,
            RequestStatus::Confirmed,
        ] {
            assert_eq!(status.as_str().parse::<RequestStatus>(), Ok(status));
        }
        assert!("cancelled".parse::<RequestStatus>().is_err());
    }
}
