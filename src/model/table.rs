use serde::{Deserialize, Serialize};

/// A dining table placed on the floor-plan canvas. Keyed by `(name, id_user)`;
/// the same table name can exist for different users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub x_coordinate: f64,
    pub y_coordinate: f64,
    pub width: f64,
    pub height: f64,
    pub id_user: String,
}

/// Input model for creating a table
#[derive(Debug, Clone, Deserialize)]
pub struct NewTable {
    pub name: Option<String>,
    pub x_coordinate: Option<f64>,
    pub y_coordinate: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl NewTable {
    /// Complete the input into a full row. Returns None when any field is
    /// missing or the name is empty; zero-valued coordinates and sizes are
    /// legitimate (a table can sit at the canvas origin).
    pub fn into_table(self, id_user: String) -> Option<Table> {
        let name = self.name.filter(|n| !n.is_empty())?;
        Some(Table {
            name,
            x_coordinate: self.x_coordinate?,
            y_coordinate: self.y_coordinate?,
            width: self.width?,
            height: self.height?,
            id_user,
        })
    }
}

/// Partial update for a table; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableUpdate {
    pub x_coordinate: Option<f64>,
    pub y_coordinate: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl TableUpdate {
    pub fn apply_to(self, table: &mut Table) {
        if let Some(x_coordinate) = self.x_coordinate {
            table.x_coordinate = x_coordinate;
        }
        if let Some(y_coordinate) = self.y_coordinate {
            table.y_coordinate = y_coordinate;
        }
        if let Some(width) = self.width {
            table.width = width;
        }
        if let Some(height) = self.height {
            table.height = height;
        }
    }
}
