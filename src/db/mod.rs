pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::{create_pool, PostgresStore};
pub use store::WardrobeStore;

#[cfg(test)]
pub use store::MockWardrobeStore;
