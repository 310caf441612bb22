//! Redis credential store provider.

pub mod operations;

pub use operations::RedisStoreProvider;
