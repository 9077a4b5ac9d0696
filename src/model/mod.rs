//! Domain entities.
//!
//! Resources ([`User`], [`Room`], [`Song`], [`Playlist`]) are stored in the
//! [`World`](crate::state::World) and declare their attributes as field
//! tables. Value objects ([`Vote`], [`Message`], [`Snag`], [`Boot`]) are
//! built per event and refer to resources by id.

mod boot;
mod message;
mod playlist;
mod room;
mod snag;
mod song;
mod user;
mod vote;

pub use boot::Boot;
pub use message::Message;
pub use playlist::Playlist;
pub use room::Room;
pub use snag::Snag;
pub use song::Song;
pub use user::User;
pub use vote::{Direction, Vote};

pub(crate) use playlist::DEFAULT_PLAYLIST;
pub(crate) use room::{DJS, LISTENERS, MODERATORS, room_payload};

use crate::error::{ClientError, ClientResult};
use crate::resource::{Attributes, value};
use crate::state::World;
use serde_json::Value;

/// Build or look up the users referenced by a raw list attribute. Entries
/// may be full user maps or bare ids.
pub(crate) fn build_users(world: &mut World, key: &'static str, raw: Value) -> ClientResult<Vec<String>> {
    value::list(key, raw)?
        .into_iter()
        .map(|entry| build_user(world, key, entry))
        .collect()
}

pub(crate) fn build_user(world: &mut World, key: &'static str, raw: Value) -> ClientResult<String> {
    match raw {
        Value::Object(attrs) => world.build::<User>(attrs),
        other => {
            let id = value::id_string(&other).ok_or(ClientError::Attribute {
                key,
                expected: "a user id or user map",
            })?;
            world.ensure::<User>(&id);
            Ok(id)
        }
    }
}

/// Move the keys of a nested `metadata` map up to the top level.
pub(crate) fn flatten_metadata(mut attrs: Attributes) -> Attributes {
    if let Some(Value::Object(metadata)) = attrs.remove("metadata") {
        attrs.extend(metadata);
    }
    attrs
}

/// Id field of a value-object payload.
pub(crate) fn required_id(attrs: &Attributes, keys: &[&str], key: &'static str) -> ClientResult<String> {
    keys.iter()
        .find_map(|k| attrs.get(*k).and_then(value::id_string))
        .ok_or(ClientError::Attribute {
            key,
            expected: "an id",
        })
}

pub(crate) fn optional_id(attrs: &Attributes, key: &str) -> Option<String> {
    attrs.get(key).and_then(value::id_string)
}
