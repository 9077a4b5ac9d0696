//! Core event infrastructure.
//!
//! This module contains the fundamental types of the event pipeline: the
//! command registry, the typecast context and the constructed event.
//!
//! ## Pipeline
//!
//! 1. A raw message map names a protocol `command`.
//! 2. The [`Registry`] resolves it to an event name and a [`Typecast`].
//! 3. The typecast runs against an explicit [`Context`] (graph, session,
//!    registry), mutating the graph and producing a [`Cast`].
//! 4. [`Event`] records the command, event name, raw data and the cast
//!    normalized into an ordered result list.

pub mod context;
pub mod event;
pub mod registry;

pub use context::Context;
pub use event::{Cast, Event, EventValue};
pub use registry::{Entry, Registry, Typecast};
