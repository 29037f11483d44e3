//! Port implementations.
//!
//! `live` talks to the real world, `recording` wraps live adapters and
//! captures cassettes, `replaying` serves cassettes back, and `scripted`
//! holds the non-interactive operators used for batch runs and tests.

pub mod live;
pub mod recording;
pub mod replaying;
pub mod scripted;
