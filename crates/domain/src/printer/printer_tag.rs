use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Operator-facing name of a printer, distinct from its network address.
///
/// Rules:
/// - Must not be blank
/// - Max length 64 characters
///
/// Any other text is accepted, so config-file ids such as `front desk` work.
/// The `id:ip,...` command-line list cannot express `,` or `:` in an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrinterTag(String);

impl PrinterTag {
    /// Create a new PrinterTag with validation
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();

        if tag.trim().is_empty() {
            return Err(DomainError::InvalidPrinterTag(
                "Printer tag cannot be empty".to_string(),
            ));
        }

        if tag.chars().count() > 64 {
            return Err(DomainError::InvalidPrinterTag(format!(
                "Printer tag too long: {} chars (max 64)",
                tag.chars().count()
            )));
        }

        Ok(Self(tag))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PrinterTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
