pub mod health;
pub mod list;
pub mod put;
pub mod get;
pub mod delete;

pub use health::health_handler;
pub use list::list_handler;
pub use put::put_handler;
pub use get::get_handler;
pub use delete::{delete_handler, delete_missing_key_handler};
