//! Client for the service that converts cutting files from SVG to DXF
//!
//! The service fetches the SVG from a public URL, converts it and stores the DXF next to it.
//! Only the path of the stored DXF is returned to the caller.

pub mod converter;

pub use converter::{ConvertRequest, ConvertResponse, DxfConverter, DxfError, interpret_response};
