//! Error types for u-loading.

use thiserror::Error;

/// Result type alias for u-loading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during stacking/packing operations.
///
/// Running out of room is not an error: the packers report what they could
/// not place alongside a partial result. Only inputs that make the whole run
/// meaningless are surfaced here.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid geometry provided.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid boundary provided.
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An item is taller than the maximum stack height on its own.
    #[error("Item {item} is {height} high, exceeding the maximum stack height {max_height}")]
    ItemTooTall {
        /// Name of the offending item.
        item: String,
        /// Its height.
        height: f64,
        /// The configured maximum stack height.
        max_height: f64,
    },

    /// An object alone is heavier than the container may carry.
    #[error("Object {item} weighs {weight}, exceeding the maximum container weight {max_weight}")]
    TooHeavy {
        /// Name of the offending object.
        item: String,
        /// Its weight.
        weight: f64,
        /// The configured weight limit.
        max_weight: f64,
    },

    /// Serialization error.
    #[cfg(feature = "serde")]
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true for input errors that abort a run outright.
    pub fn is_fatal_input(&self) -> bool {
        matches!(self, Error::ItemTooTall { .. } | Error::TooHeavy { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_input_classification() {
        let tall = Error::ItemTooTall {
            item: "crate".to_string(),
            height: 12.0,
            max_height: 10.0,
        };
        let heavy = Error::TooHeavy {
            item: "Stack_1".to_string(),
            weight: 900.0,
            max_weight: 500.0,
        };
        assert!(tall.is_fatal_input());
        assert!(heavy.is_fatal_input());
        assert!(!Error::ConfigError("bad".to_string()).is_fatal_input());
    }

    #[test]
    fn test_error_display() {
        let err = Error::TooHeavy {
            item: "A".to_string(),
            weight: 2.0,
            max_weight: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "Object A weighs 2, exceeding the maximum container weight 1"
        );
    }
}
