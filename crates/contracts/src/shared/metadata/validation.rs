//! Column constraints for metadata fields

use serde::Serialize;

/// Constraints declared on a column
/// Copy trait for efficient passing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationRules {
    pub nullable: bool,
    pub max_length: Option<usize>,
    pub unique: bool,
}

impl ValidationRules {
    /// Nullable column without length or uniqueness constraints
    pub const fn none() -> Self {
        Self {
            nullable: true,
            max_length: None,
            unique: false,
        }
    }

    /// Non-nullable column
    pub const fn required() -> Self {
        Self {
            nullable: false,
            max_length: None,
            unique: false,
        }
    }

    pub const fn is_required(&self) -> bool {
        !self.nullable
    }

    /// Length check for text values, counted in characters
    pub fn exceeds_max_length(&self, value: &str) -> bool {
        match self.max_length {
            Some(max) => value.chars().count() > max,
            None => false,
        }
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_length_counts_characters() {
        let rules = ValidationRules {
            max_length: Some(4),
            ..ValidationRules::none()
        };
        assert!(!rules.exceeds_max_length("Área"));
        assert!(rules.exceeds_max_length("Áreas"));
    }

    #[test]
    fn test_no_limit_never_exceeds() {
        let rules = ValidationRules::required();
        assert!(!rules.exceeds_max_length(&"x".repeat(10_000)));
        assert!(rules.is_required());
    }
}
