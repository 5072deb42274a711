//! Instance file reading and writing.

use crate::dataset::{Form, Instance};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when reading or writing instances.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid instance format: {0}")]
    InvalidFormat(String),
}

/// Reader and writer of instance JSON files.
#[derive(Debug, Default)]
pub struct InstanceParser;

impl InstanceParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses an instance from a JSON file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Instance, ParseError> {
        let content = fs::read_to_string(path)?;
        self.parse_json(&content)
    }

    /// Parses an instance from a JSON string.
    pub fn parse_json(&self, json: &str) -> Result<Instance, ParseError> {
        let instance: Instance = serde_json::from_str(json)?;
        self.check(&instance)?;
        Ok(instance)
    }

    /// Writes an instance as pretty JSON.
    pub fn save_file(&self, instance: &Instance, path: impl AsRef<Path>) -> Result<(), ParseError> {
        let json = serde_json::to_string_pretty(instance)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn check(&self, instance: &Instance) -> Result<(), ParseError> {
        let c = &instance.container;
        if [c.width, c.length, c.height]
            .iter()
            .any(|d| !d.is_finite() || *d <= 0.0)
        {
            return Err(ParseError::InvalidFormat(format!(
                "container of '{}' must have positive dimensions",
                instance.name
            )));
        }

        for object in &instance.objects {
            let dims_ok = match object.form {
                Form::Box {
                    length,
                    width,
                    height,
                } => length > 0.0 && width > 0.0 && height > 0.0,
                Form::Cylinder { radius, height } => radius > 0.0 && height > 0.0,
            };
            if !dims_ok {
                return Err(ParseError::InvalidFormat(format!(
                    "object '{}' must have positive dimensions",
                    object.name
                )));
            }
            if object.quantity == 0 {
                return Err(ParseError::InvalidFormat(format!(
                    "object '{}' has zero quantity",
                    object.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instance() {
        let json = r#"{
            "name": "test",
            "container": { "width": 2.4, "length": 6.0, "height": 2.6, "max_weight": 5000.0 },
            "objects": [
                {
                    "name": "pallet",
                    "form": { "type": "box", "length": 1.2, "width": 0.8, "height": 1.0 },
                    "weight": 250.0,
                    "quantity": 4
                },
                {
                    "name": "drum",
                    "form": { "type": "cylinder", "radius": 0.3, "height": 0.9 }
                }
            ]
        }"#;

        let instance = InstanceParser::new().parse_json(json).unwrap();
        assert_eq!(instance.name, "test");
        assert_eq!(instance.objects.len(), 2);
        assert_eq!(instance.objects[0].quantity, 4);
        assert_eq!(instance.objects[1].quantity, 1);
        assert_eq!(instance.objects[1].weight, 0.0);
        assert!(matches!(instance.objects[1].form, Form::Cylinder { .. }));
        assert_eq!(instance.expand_items().len(), 5);
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let json = r#"{
            "name": "bad",
            "container": { "width": 1.0, "length": 1.0, "height": 1.0 },
            "objects": [
                { "name": "x", "form": { "type": "box", "length": 1.0, "width": 1.0, "height": 1.0 }, "quantity": 0 }
            ]
        }"#;
        let err = InstanceParser::new().parse_json(json).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = InstanceParser::new().parse_json("{ not json").unwrap_err();
        assert!(matches!(err, ParseError::JsonError(_)));
    }
}
