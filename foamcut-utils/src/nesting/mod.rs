//! From order items to nested foam sheets

mod order_split;
mod outline;
mod processor;
mod products;
mod report;
mod sku;

pub use order_split::{DEFAULT_PRIORITY, split_parts_by_order};
pub use outline::{OutlineSource, PreparedOutline, SvgDirectory, main_outline, prepare_outline};
pub use processor::{NestingProcessor, PartExpansion, ProcessorConfig, UNKNOWN_FOAM_SHEET};
pub use products::{RectangularProduct, pack_multiplier, rectangular_product};
pub use report::{DimensionCheck, generate_dimension_check_report};
pub use sku::{CompositeCatalogue, SubPart, get_foam_sheet_from_sku};
