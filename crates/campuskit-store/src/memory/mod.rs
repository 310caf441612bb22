//! In-memory credential store provider.

pub mod store;

pub use store::MemoryStoreProvider;
