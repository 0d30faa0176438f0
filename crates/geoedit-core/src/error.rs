//! Error types for misuse of the editing API.
//!
//! Interaction itself never fails: events that do not apply are ignored.
//! These errors signal a precondition violated by the integrating code.

use crate::shapes::ShapeType;
use thiserror::Error;

/// Precondition violations raised by handles, editors and controllers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditError {
    #[error("Shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: ShapeType },
    #[error("Index {index} out of range for {len} elements")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Sub-shape {index} out of range for {shape_type} with {count} sub-shapes")]
    SubShapeOutOfRange {
        index: usize,
        count: usize,
        shape_type: ShapeType,
    },
    #[error("Layer not found: {0}")]
    UnknownLayer(String),
    #[error("Feature not found: {0}")]
    UnknownFeature(String),
    #[error("No editor can edit shape type {0}")]
    NoEditor(ShapeType),
    #[error("Creation of {0} is not supported")]
    UnsupportedCreation(ShapeType),
    #[error("Controller is active: {0}")]
    ControllerActive(String),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl EditError {
    /// Shape mismatch for a handle or editor that expects `expected`.
    pub fn mismatch(expected: impl Into<String>, found: ShapeType) -> Self {
        EditError::ShapeMismatch {
            expected: expected.into(),
            found,
        }
    }

    /// Validate an index against a length.
    pub fn check_index(index: usize, len: usize) -> EditResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(EditError::IndexOutOfRange { index, len })
        }
    }
}

/// Result type for editing operations.
pub type EditResult<T> = Result<T, EditError>;
