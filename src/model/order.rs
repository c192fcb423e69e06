use serde::{Deserialize, Serialize};

/// One accumulated order line: how many of a menu item have been ordered at
/// a table. Keyed by `(table_name, menu_item_name, id_user)`; re-submitting
/// the same pair adds to `quantity` rather than creating a second row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub table_name: String,
    pub menu_item_name: String,
    pub id_user: String,
    pub quantity: i64,
}

/// One element of the order submission batch
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderEntry {
    pub table_name: Option<String>,
    pub menu_item_name: Option<String>,
    pub quantity: Option<i64>,
}

impl NewOrderEntry {
    /// Complete the input into a full entry, or None when a field is missing
    /// or a name is empty. Quantity of zero is accepted.
    pub fn into_entry(self, id_user: String) -> Option<OrderEntry> {
        let table_name = self.table_name.filter(|n| !n.is_empty())?;
        let menu_item_name = self.menu_item_name.filter(|n| !n.is_empty())?;
        Some(OrderEntry {
            table_name,
            menu_item_name,
            id_user,
            quantity: self.quantity?,
        })
    }
}
