mod nesting_item;
mod nesting_result;
mod part;
mod sheet;

#[doc(inline)]
pub use nesting_item::NestingItem;
#[doc(inline)]
pub use nesting_result::{NestingResult, ProcessedNestingData, UnplaceablePart, UnplaceableReason};
#[doc(inline)]
pub use part::{Part, PartSource, align_placements_to_origin, validate_placement_bounds};
#[doc(inline)]
pub use sheet::{Sheet, SheetType};
