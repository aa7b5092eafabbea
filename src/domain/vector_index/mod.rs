//! Vector index domain models and the storage trait
//!
//! The index is the black-box collaborator behind the semantic cache and the
//! FAQ store: build, append, k-NN by distance, load and persist.

mod entry;
mod index;
mod store;

pub use entry::IndexedEntry;
pub use index::{Neighbor, VectorIndex};
pub use store::{IndexStore, IndexUpdate};
