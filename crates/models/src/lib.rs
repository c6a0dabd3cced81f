//! Item record type and its flat field-map representation.
//!
//! Storage backends only ever see string pairs produced by [`mapper::to_fields`];
//! everything typed lives here.

pub mod errors;
pub mod item;
pub mod mapper;

pub use item::Item;
