//! State management module.
//!
//! Contains the World (the client's resource graph) and session state.

mod session;
mod world;

pub use session::{Session, UNKNOWN_REASON};
pub use world::World;
