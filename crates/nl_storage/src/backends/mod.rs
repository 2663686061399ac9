pub mod memory;

pub use memory::{MemoryConfig, MemoryStorage};
