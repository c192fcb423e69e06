pub mod menu;
pub mod order;
pub mod table;
pub mod user;

pub use menu::*;
pub use order::*;
pub use table::*;
pub use user::*;
