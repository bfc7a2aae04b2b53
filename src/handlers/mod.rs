pub mod health;
pub mod list;
pub mod read_key;
pub mod write_key;
pub mod delete_keys;

pub use health::health_handler;
pub use list::list_handler;
pub use read_key::read_key_handler;
pub use write_key::write_key_handler;
pub use delete_keys::delete_keys_handler;
