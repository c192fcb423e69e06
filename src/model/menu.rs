use serde::{Deserialize, Serialize};

/// A dish on a user's menu. Keyed by `(name, id_user)`. `quantity` is the
/// remaining stock, not an order amount. `description` is nullable and is
/// always present in the serialized shape (as `null` when unset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub description: Option<String>,
    pub id_user: String,
}

/// Input model for the create-or-replace menu endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct NewMenuItem {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
}

impl NewMenuItem {
    /// Complete the input into a full row, or None when name/price/quantity
    /// are missing (or the name is empty). A replace carries the description
    /// as given, so omitting it clears any stored one.
    pub fn into_menu_item(self, id_user: String) -> Option<MenuItem> {
        let name = self.name.filter(|n| !n.is_empty())?;
        Some(MenuItem {
            name,
            price: self.price?,
            quantity: self.quantity?,
            description: self.description,
            id_user,
        })
    }
}

/// Partial update for a menu item; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemUpdate {
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
}

impl MenuItemUpdate {
    pub fn apply_to(self, item: &mut MenuItem) {
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(description) = self.description {
            item.description = Some(description);
        }
    }
}
