//! Service layer: the key-value store seam and the item repository on top of it.
//! - `storage` hides whether records live in Redis or in process memory.
//! - `items` turns typed records into hash/set commands and back.

pub mod errors;
pub mod items;
pub mod storage;
#[cfg(test)]
pub mod test_support;

pub use items::repository::ItemRepository;
pub use storage::KvStore;
