//! Validation of SVG outline assets against the expected dimensions of their SKU

pub mod checkpoint;
mod dimensions;
mod parsing;
mod reference;
mod report;
mod units;
mod validator;

pub use dimensions::{
    PATH_UNITS, PathBounds, SvgDimensions, VIEWBOX_UNIT, calculate_path_bounds,
    extract_svg_dimensions, parse_svg_dimension, parse_view_box,
};
pub use parsing::{
    extract_path_coordinates, parse_svg_path, path_data, set_svg_root_attribute,
    svg_root_attribute,
};
pub use reference::{DimensionTable, ExpectedDimensions};
pub use report::generate_validation_report;
pub use units::{PX_TO_MM, convert_to_mm};
pub use validator::{
    DIMENSION_TOLERANCE_PERCENT, DimensionDifference, ValidationError, ValidationResult,
    batch_validate_svgs, generate_corrected_svg, validate_svg_dimensions,
};
