use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use crate::model::{MenuItem, OrderEntry, Table, User};
use crate::store::traits::{MenuStore, OrderStore, Store, TableStore, UserStore};

/// Schema statements, applied in order. Tables and menu items are keyed per
/// user, order entries reference both so a SQLite-level cascade backs up the
/// explicit deletes below.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        email TEXT PRIMARY KEY,
        password TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tables (
        name TEXT NOT NULL,
        x_coordinate REAL NOT NULL,
        y_coordinate REAL NOT NULL,
        width REAL NOT NULL,
        height REAL NOT NULL,
        id_user TEXT NOT NULL,
        PRIMARY KEY (name, id_user),
        FOREIGN KEY (id_user) REFERENCES users(email) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS menu_items (
        name TEXT NOT NULL,
        price REAL NOT NULL,
        quantity INTEGER NOT NULL,
        description TEXT,
        id_user TEXT NOT NULL,
        PRIMARY KEY (name, id_user),
        FOREIGN KEY (id_user) REFERENCES users(email) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_entries (
        table_name TEXT NOT NULL,
        menu_item_name TEXT NOT NULL,
        id_user TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        PRIMARY KEY (table_name, menu_item_name, id_user),
        FOREIGN KEY (id_user) REFERENCES users(email) ON DELETE CASCADE,
        FOREIGN KEY (table_name, id_user) REFERENCES tables(name, id_user) ON DELETE CASCADE,
        FOREIGN KEY (menu_item_name, id_user) REFERENCES menu_items(name, id_user) ON DELETE CASCADE
    )
    "#,
];

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the SQLite database at the given URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid SQLite database URL")?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to create SQLite connection pool")?;

        Ok(Self { pool })
    }

    /// Open a private in-memory database. The pool is pinned to a single
    /// connection that never expires, otherwise the data would vanish with it.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid SQLite database URL")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to create SQLite connection pool")?;

        Ok(Self { pool })
    }

    /// Create the schema if it is not already present
    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to apply database schema")?;
        }
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl UserStore for SqliteStore {
    async fn get_user(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT email, password FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(User {
            email: row.get("email"),
            password: row.get("password"),
        }))
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        sqlx::query("INSERT INTO users (email, password) VALUES (?, ?)")
            .bind(&user.email)
            .bind(&user.password)
            .execute(&self.pool)
            .await
            .context("Failed to insert user")?;

        Ok(())
    }

    async fn delete_user(&self, email: &str) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM order_entries WHERE id_user = ?")
            .bind(email)
            .execute(&mut *tx)
            .await
            .context("Failed to delete user's order entries")?;

        sqlx::query("DELETE FROM menu_items WHERE id_user = ?")
            .bind(email)
            .execute(&mut *tx)
            .await
            .context("Failed to delete user's menu items")?;

        sqlx::query("DELETE FROM tables WHERE id_user = ?")
            .bind(email)
            .execute(&mut *tx)
            .await
            .context("Failed to delete user's tables")?;

        let result = sqlx::query("DELETE FROM users WHERE email = ?")
            .bind(email)
            .execute(&mut *tx)
            .await
            .context("Failed to delete user")?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl TableStore for SqliteStore {
    async fn get_table(&self, id_user: &str, name: &str) -> Result<Option<Table>> {
        let row = sqlx::query(
            "SELECT name, x_coordinate, y_coordinate, width, height, id_user FROM tables WHERE id_user = ? AND name = ?",
        )
        .bind(id_user)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch table")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(table_from_row(&row)))
    }

    async fn list_tables_for_user(&self, id_user: &str) -> Result<Vec<Table>> {
        let rows = sqlx::query(
            "SELECT name, x_coordinate, y_coordinate, width, height, id_user FROM tables WHERE id_user = ? ORDER BY name",
        )
        .bind(id_user)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list tables")?;

        Ok(rows.iter().map(table_from_row).collect())
    }

    async fn insert_table(&self, table: Table) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tables (name, x_coordinate, y_coordinate, width, height, id_user)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&table.name)
        .bind(table.x_coordinate)
        .bind(table.y_coordinate)
        .bind(table.width)
        .bind(table.height)
        .bind(&table.id_user)
        .execute(&self.pool)
        .await
        .context("Failed to insert table")?;

        Ok(())
    }

    async fn update_table(&self, table: &Table) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tables
            SET x_coordinate = ?, y_coordinate = ?, width = ?, height = ?
            WHERE id_user = ? AND name = ?
            "#,
        )
        .bind(table.x_coordinate)
        .bind(table.y_coordinate)
        .bind(table.width)
        .bind(table.height)
        .bind(&table.id_user)
        .bind(&table.name)
        .execute(&self.pool)
        .await
        .context("Failed to update table")?;

        Ok(())
    }

    async fn delete_table(&self, id_user: &str, name: &str) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM order_entries WHERE id_user = ? AND table_name = ?")
            .bind(id_user)
            .bind(name)
            .execute(&mut *tx)
            .await
            .context("Failed to delete table's order entries")?;

        let result = sqlx::query("DELETE FROM tables WHERE id_user = ? AND name = ?")
            .bind(id_user)
            .bind(name)
            .execute(&mut *tx)
            .await
            .context("Failed to delete table")?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl MenuStore for SqliteStore {
    async fn get_menu_item(&self, id_user: &str, name: &str) -> Result<Option<MenuItem>> {
        let row = sqlx::query(
            "SELECT name, price, quantity, description, id_user FROM menu_items WHERE id_user = ? AND name = ?",
        )
        .bind(id_user)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch menu item")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(menu_item_from_row(&row)))
    }

    async fn list_menu_for_user(&self, id_user: &str) -> Result<Vec<MenuItem>> {
        let rows = sqlx::query(
            "SELECT name, price, quantity, description, id_user FROM menu_items WHERE id_user = ? ORDER BY name",
        )
        .bind(id_user)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list menu items")?;

        Ok(rows.iter().map(menu_item_from_row).collect())
    }

    async fn upsert_menu_item(&self, item: MenuItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO menu_items (name, price, quantity, description, id_user)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (name, id_user) DO UPDATE SET
                price = excluded.price,
                quantity = excluded.quantity,
                description = excluded.description
            "#,
        )
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(&item.description)
        .bind(&item.id_user)
        .execute(&self.pool)
        .await
        .context("Failed to upsert menu item")?;

        Ok(())
    }

    async fn delete_menu_item(&self, id_user: &str, name: &str) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM order_entries WHERE id_user = ? AND menu_item_name = ?")
            .bind(id_user)
            .bind(name)
            .execute(&mut *tx)
            .await
            .context("Failed to delete menu item's order entries")?;

        let result = sqlx::query("DELETE FROM menu_items WHERE id_user = ? AND name = ?")
            .bind(id_user)
            .bind(name)
            .execute(&mut *tx)
            .await
            .context("Failed to delete menu item")?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl OrderStore for SqliteStore {
    async fn list_order_entries_for_user(&self, id_user: &str) -> Result<Vec<OrderEntry>> {
        let rows = sqlx::query(
            "SELECT table_name, menu_item_name, id_user, quantity FROM order_entries WHERE id_user = ? ORDER BY table_name, menu_item_name",
        )
        .bind(id_user)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list order entries")?;

        Ok(rows.iter().map(order_entry_from_row).collect())
    }

    async fn list_order_entries_for_table(
        &self,
        id_user: &str,
        table_name: &str,
    ) -> Result<Vec<OrderEntry>> {
        let rows = sqlx::query(
            "SELECT table_name, menu_item_name, id_user, quantity FROM order_entries WHERE id_user = ? AND table_name = ? ORDER BY menu_item_name",
        )
        .bind(id_user)
        .bind(table_name)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list order entries")?;

        Ok(rows.iter().map(order_entry_from_row).collect())
    }

    async fn insert_order_entries(&self, entries: Vec<OrderEntry>) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO order_entries (table_name, menu_item_name, id_user, quantity)
                VALUES (?, ?, ?, ?)
                ON CONFLICT (table_name, menu_item_name, id_user) DO UPDATE SET
                    quantity = quantity + excluded.quantity
                "#,
            )
            .bind(&entry.table_name)
            .bind(&entry.menu_item_name)
            .bind(&entry.id_user)
            .bind(entry.quantity)
            .execute(&mut *tx)
            .await
            .context("Failed to insert order entry")?;
        }

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(())
    }
}

impl Store for SqliteStore {}

fn table_from_row(row: &sqlx::sqlite::SqliteRow) -> Table {
    Table {
        name: row.get("name"),
        x_coordinate: row.get("x_coordinate"),
        y_coordinate: row.get("y_coordinate"),
        width: row.get("width"),
        height: row.get("height"),
        id_user: row.get("id_user"),
    }
}

fn menu_item_from_row(row: &sqlx::sqlite::SqliteRow) -> MenuItem {
    MenuItem {
        name: row.get("name"),
        price: row.get("price"),
        quantity: row.get("quantity"),
        description: row.get("description"),
        id_user: row.get("id_user"),
    }
}

fn order_entry_from_row(row: &sqlx::sqlite::SqliteRow) -> OrderEntry {
    OrderEntry {
        table_name: row.get("table_name"),
        menu_item_name: row.get("menu_item_name"),
        id_user: row.get("id_user"),
        quantity: row.get("quantity"),
    }
}
