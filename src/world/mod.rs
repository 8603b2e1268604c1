pub mod memoryworld;
pub mod snapshot;

pub use memoryworld::*;
pub use snapshot::*;
