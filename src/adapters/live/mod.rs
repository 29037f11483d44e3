//! Live adapters backed by the real system: wall clock, disk, terminal and
//! the HTTP tagging service.

pub mod clock;
pub mod filesystem;
pub mod operator;
pub mod tagger;

pub use clock::SystemClock;
pub use filesystem::DiskFileSystem;
pub use operator::TerminalOperator;
pub use tagger::UdpipeTagger;
