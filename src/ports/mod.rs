//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the resynchronization core and
//! the outside world (time, disk, the human operator, the tagging service).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod operator;
pub mod tagger;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use operator::{Confirmation, Operator, Topic};
pub use tagger::{TagFuture, TagRequest, TagResponse, Tagger};
