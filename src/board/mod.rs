//! Board domain model
//!
//! - `item`: items and column descriptors
//! - `columns`: the validated column set of a board
//! - `store`: the indexed, authoritative item collection
//! - `projector`: derives column membership from the item collection

mod columns;
mod item;
mod projector;
mod store;

pub use columns::ColumnSet;
pub use item::{ColumnDescriptor, Item};
pub use projector::{ColumnProjection, Projection, project};
pub use store::ItemStore;
