pub mod auto;
pub mod local;
pub mod memory;

pub use auto::auto_detect_storage;
pub use local::LocalStorage;
pub use memory::MemoryStorage;
