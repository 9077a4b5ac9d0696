//! Event typecasts.
//!
//! This module contains the registry and context for turning inbound
//! protocol messages into typed events, and the typecast for every built-in
//! command.
//!
//! Typecasts receive the raw message map and a [`Context`]. They mutate the
//! resource graph as part of the cast (membership changes, song changes, vote
//! totals) and return the values subscribers receive.

pub mod core;
mod chat;
mod membership;
mod playback;
mod search;
mod session;

pub use core::{Cast, Context, Entry, Event, EventValue, Registry, Typecast};

/// Built-in protocol commands, their event names and typecasts.
pub(crate) const STANDARD: &[(&str, &str, Typecast)] = &[
    // Session
    ("killdashnine", "session_end_requested", session::session_end_requested),
    // Room membership
    ("registered", "user_entered", membership::user_entered),
    ("deregistered", "user_left", membership::user_left),
    ("add_dj", "dj_added", membership::dj_added),
    ("rem_dj", "dj_removed", membership::dj_removed),
    ("new_moderator", "moderator_added", membership::moderator_added),
    ("rem_moderator", "moderator_removed", membership::moderator_removed),
    ("update_user", "user_updated", membership::user_updated),
    // Room and chat
    ("update_room", "room_updated", chat::room_updated),
    ("speak", "user_spoke", chat::user_spoke),
    ("pmmed", "message_received", chat::message_received),
    ("booted_user", "user_booted", chat::user_booted),
    // Playback
    ("newsong", "song_started", playback::song_started),
    ("endsong", "song_ended", playback::song_ended),
    ("nosong", "song_unavailable", playback::song_unavailable),
    ("song_blocked", "song_blocked", playback::song_blocked),
    ("song_limited", "song_limited", playback::song_limited),
    ("update_votes", "song_voted", playback::song_voted),
    ("snagged", "song_snagged", playback::song_snagged),
    // Search
    ("search_complete", "search_completed", search::search_completed),
    ("search_failed", "search_failed", search::search_failed),
];
