use serde::{Deserialize, Serialize};

/// A line of an order: `quantity` copies of the product identified by `sku`,
/// to be cut from `foam_sheet`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NestingItem {
    pub order_id: String,
    pub customer_name: String,
    pub sku: String,
    pub quantity: usize,
    pub foam_sheet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    /// Lower value means more urgent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}
