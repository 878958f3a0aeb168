//! Utilities around the foamcut nesting engine
//!
//! This crate validates SVG outline assets against a reference table of expected dimensions,
//! encodes the SKU rules of the product catalogue and expands order items into nestable parts.

pub mod nesting;
pub mod svg_validation;

pub use nesting::{NestingProcessor, ProcessorConfig};
pub use svg_validation::{
    DimensionTable, ValidationError, ValidationResult, generate_validation_report,
    validate_svg_dimensions,
};
