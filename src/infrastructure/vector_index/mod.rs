//! Vector index store implementations

mod file;
mod in_memory;
mod lock;

pub use file::FileIndexStore;
pub use in_memory::InMemoryIndexStore;
