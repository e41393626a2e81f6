use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Text shown on one identity badge.
///
/// Every field is free-form. A field missing from the incoming payload is
/// treated as empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub employee_id: String,
}

impl BadgeRecord {
    pub fn new(
        name: impl Into<String>,
        company: impl Into<String>,
        role: impl Into<String>,
        employee_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            company: company.into(),
            role: role.into(),
            employee_id: employee_id.into(),
        }
    }
}

/// One badge print request as delivered by the message source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintRequest {
    #[serde(flatten)]
    pub badge: BadgeRecord,
    /// Tag of the target printer.
    #[serde(default)]
    pub printer_id: String,
}

impl PrintRequest {
    pub fn new(badge: BadgeRecord, printer_id: impl Into<String>) -> Self {
        Self {
            badge,
            printer_id: printer_id.into(),
        }
    }

    /// Decode a JSON message body.
    pub fn from_json(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload).map_err(|e| DomainError::InvalidRequest(e.to_string()))
    }
}
