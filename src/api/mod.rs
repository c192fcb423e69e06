pub mod handlers;
pub mod menu_handlers;
pub mod order_handlers;
pub mod routes;
pub mod table_handlers;

pub use handlers::*;
pub use menu_handlers::*;
pub use order_handlers::*;
pub use routes::*;
pub use table_handlers::*;
