/// Conversion of external representations into internal entities
pub mod import;
/// Conversion of nesting results into their external representation
pub mod export;
/// Serializable representations of instances and solutions
pub mod ext_repr;
/// SVG rendering of sheets
pub mod svg;
