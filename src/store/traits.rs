use crate::model::{MenuItem, OrderEntry, Table, User};
use anyhow::Result;

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, email: &str) -> Result<Option<User>>;
    /// Insert a new user; fails when the email is already registered
    async fn insert_user(&self, user: User) -> Result<()>;
    /// Delete a user and everything they own; false when no such user
    async fn delete_user(&self, email: &str) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait TableStore: Send + Sync {
    async fn get_table(&self, id_user: &str, name: &str) -> Result<Option<Table>>;
    /// List a user's tables ordered by name
    async fn list_tables_for_user(&self, id_user: &str) -> Result<Vec<Table>>;
    /// Insert a new table; fails when the user already has one with this name
    async fn insert_table(&self, table: Table) -> Result<()>;
    /// Write back a full table row (geometry updates)
    async fn update_table(&self, table: &Table) -> Result<()>;
    /// Delete a table and its order entries; false when no such table
    async fn delete_table(&self, id_user: &str, name: &str) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait MenuStore: Send + Sync {
    async fn get_menu_item(&self, id_user: &str, name: &str) -> Result<Option<MenuItem>>;
    /// List a user's menu items ordered by name
    async fn list_menu_for_user(&self, id_user: &str) -> Result<Vec<MenuItem>>;
    /// Insert or fully replace a menu item
    async fn upsert_menu_item(&self, item: MenuItem) -> Result<()>;
    /// Delete a menu item and its order entries; false when no such item
    async fn delete_menu_item(&self, id_user: &str, name: &str) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    /// List a user's order entries ordered by table then menu item name
    async fn list_order_entries_for_user(&self, id_user: &str) -> Result<Vec<OrderEntry>>;
    /// List the entries for one table ordered by menu item name
    async fn list_order_entries_for_table(
        &self,
        id_user: &str,
        table_name: &str,
    ) -> Result<Vec<OrderEntry>>;
    /// Write a batch atomically, adding quantities onto existing entries
    async fn insert_order_entries(&self, entries: Vec<OrderEntry>) -> Result<()>;
}

pub trait Store: UserStore + TableStore + MenuStore + OrderStore + Send + Sync {}
