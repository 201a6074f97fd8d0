//! Input validation rules enforced at the domain store boundary.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty after trimming surrounding whitespace.
    BlankName,
    /// Attendance grid has no selected cell.
    EmptySelection,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must not be blank"),
            Self::EmptySelection => write!(f, "attendance selection must not be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Trims a display name and rejects blank input.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, ValidationError};

    #[test]
    fn normalize_name_trims_surrounding_whitespace() {
        assert_eq!(normalize_name("  Ada Lovelace\t").unwrap(), "Ada Lovelace");
    }

    #[test]
    fn normalize_name_keeps_inner_whitespace() {
        assert_eq!(normalize_name("Team  Lunch").unwrap(), "Team  Lunch");
    }

    #[test]
    fn normalize_name_rejects_whitespace_only() {
        assert_eq!(normalize_name(" \n ").unwrap_err(), ValidationError::BlankName);
        assert_eq!(normalize_name("").unwrap_err(), ValidationError::BlankName);
    }
}
