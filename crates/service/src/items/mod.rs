pub mod info;
pub mod legacy;
pub mod repository;

pub use info::connection_info;
pub use repository::{ItemRepository, INDEX_SET_KEY, KEY_PREFIX};
