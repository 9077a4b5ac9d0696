//! spinroom - event dispatch and lazy resource model for real-time DJ rooms.
//!
//! Inbound service messages are JSON objects naming a `command`. A
//! [`Registry`] maps each command to an event name and a typecast; the
//! typecast applies the message to the client's resource graph ([`World`])
//! and produces typed results for subscribers. Entities (rooms, users, songs,
//! playlists) are created on first reference, deduplicated by id and loaded
//! from the service on demand through a [`Dispatcher`].

pub mod actor;
pub mod client;
pub mod config;
pub mod digest;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod model;
pub mod resource;
pub mod state;
pub mod telemetry;

pub use actor::SessionHandle;
pub use client::{Client, Handler, QueueOptions, SongApi};
pub use config::{ClientConfig, Config};
pub use dispatch::Dispatcher;
pub use error::{ClientError, ClientResult, RegistryError, RemoteCallError};
pub use handlers::{Cast, Context, Event, EventValue, Registry};
pub use model::{Boot, Direction, Message, Playlist, Room, Snag, Song, User, Vote};
pub use state::{Session, World};
