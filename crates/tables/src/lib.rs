//! decant-tables: schema data for the record kinds found in legacy saves.
//!
//! decant-core is the mechanism; this crate is the content. Every table
//! here was reverse-engineered from real saves and the legacy
//! application's source, field by field, and is expected to grow as
//! unknown-tag tallies surface kinds we have no layout for yet.

pub mod components;
pub mod items;
pub mod pieces;

pub use components::component_registry;
pub use items::{decode_image_items, decode_layout_items};
pub use pieces::piece_links;
