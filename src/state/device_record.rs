/// Device record definitions
///
/// A record is the terminal, immutable result of resolving one device
/// reference. Failures are carried as data so that one broken detail page
/// never affects its siblings.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of fetching one device detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatus {
    /// The detail page was fetched and its title extracted
    Ok,

    /// The detail page could not be fetched; carries the reason
    Error(String),
}

impl DeviceStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// The resolved result of one device reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RecordRepr", from = "RecordRepr")]
pub struct DeviceRecord {
    pub model: String,

    /// Title from the detail page; absent for failed fetches
    pub display_name: Option<String>,

    pub status: DeviceStatus,
}

impl DeviceRecord {
    /// Creates a record for a successfully fetched device
    pub fn ok(model: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            display_name: Some(display_name.into()),
            status: DeviceStatus::Ok,
        }
    }

    /// Creates a record for a device whose detail page could not be fetched
    pub fn error(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            display_name: None,
            status: DeviceStatus::Error(reason.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }
}

// On-disk shape: {"model", "name"?, "status": "ok"|"error", "message"?}
#[derive(Serialize, Deserialize)]
struct RecordRepr {
    model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    status: StatusTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StatusTag {
    Ok,
    Error,
}

impl From<DeviceRecord> for RecordRepr {
    fn from(record: DeviceRecord) -> Self {
        let (status, message) = match record.status {
            DeviceStatus::Ok => (StatusTag::Ok, None),
            DeviceStatus::Error(message) => (StatusTag::Error, Some(message)),
        };
        Self {
            model: record.model,
            name: record.display_name,
            status,
            message,
        }
    }
}

impl From<RecordRepr> for DeviceRecord {
    fn from(repr: RecordRepr) -> Self {
        let status = match repr.status {
            StatusTag::Ok => DeviceStatus::Ok,
            StatusTag::Error => DeviceStatus::Error(repr.message.unwrap_or_default()),
        };
        Self {
            model: repr.model,
            display_name: repr.name,
            status,
        }
    }
}
