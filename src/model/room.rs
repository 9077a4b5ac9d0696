//! Rooms.
//!
//! A room owns its membership collections (listeners, DJs, moderators) as
//! ordered id lists, and the singleton current song and current DJ
//! references. Vote totals arrive on the room but belong to the current
//! song, so those keys are forwarded to it during the merge.

use super::{Song, build_user, build_users, flatten_metadata};
use crate::error::{ClientError, ClientResult};
use crate::resource::{Attributes, AttributeStore, Field, Resource, value};
use crate::state::World;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::debug;

pub(crate) const LISTENERS: &str = "users";
pub(crate) const DJS: &str = "djs";
pub(crate) const MODERATORS: &str = "moderators";

const FIELDS: &[Field] = &[
    Field::plain("name"),
    Field::remote("description"),
    Field::plain("shortcut"),
    Field::plain("section"),
    Field::plain("created_at").alias(&["created"]),
    Field::plain("max_djs"),
    Field::plain("listener_count").alias(&["listeners"]),
    Field::remote(LISTENERS).with(listeners),
    Field::plain(DJS).with(djs),
    Field::plain(MODERATORS).alias(&["moderator_id"]).with(moderators),
    Field::plain("current_dj").with(current_dj),
    Field::plain("current_song").with(current_song),
    Field::plain("upvotes").with(upvotes),
    Field::plain("downvotes").with(downvotes),
    Field::plain("votelog").with(votelog),
];

#[derive(Debug, Clone)]
pub struct Room {
    id: String,
    store: AttributeStore,
}

impl Room {
    pub fn name(&self) -> Option<&str> {
        self.store.str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.store.str("description")
    }

    /// Section the client was placed in, for rooms split into sections.
    pub fn section(&self) -> Value {
        self.store.get("section").cloned().unwrap_or(Value::Null)
    }

    pub fn max_djs(&self) -> i64 {
        self.store.i64("max_djs")
    }

    pub fn current_song(&self) -> Option<&str> {
        self.store.str("current_song")
    }

    pub fn current_dj(&self) -> Option<&str> {
        self.store.str("current_dj")
    }

    /// Listener ids in arrival order.
    pub fn listeners(&self) -> Vec<&str> {
        self.store.ids(LISTENERS)
    }

    /// DJ ids in booth order.
    pub fn djs(&self) -> Vec<&str> {
        self.store.ids(DJS)
    }

    pub fn moderators(&self) -> Vec<&str> {
        self.store.ids(MODERATORS)
    }

    pub fn is_listener(&self, user: &str) -> bool {
        self.listeners().contains(&user)
    }

    pub fn is_dj(&self, user: &str) -> bool {
        self.djs().contains(&user)
    }

    pub fn is_moderator(&self, user: &str) -> bool {
        self.moderators().contains(&user)
    }

    /// Add a user to a membership collection unless already present.
    pub(crate) fn add_member(&mut self, collection: &str, user: &str) {
        let mut ids = owned(self.store.ids(collection));
        if !ids.iter().any(|id| id == user) {
            ids.push(user.to_string());
        }
        self.store.insert(collection, json!(ids));
    }

    pub(crate) fn remove_member(&mut self, collection: &str, user: &str) {
        let mut ids = owned(self.store.ids(collection));
        ids.retain(|id| id != user);
        self.store.insert(collection, json!(ids));
    }

    pub(crate) fn clear_current_song(&mut self) {
        self.store.insert("current_song", Value::Null);
    }
}

fn owned(ids: Vec<&str>) -> Vec<String> {
    ids.into_iter().map(String::from).collect()
}

fn unique(ids: Vec<String>) -> Value {
    let mut seen: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    json!(seen)
}

fn listeners(world: &mut World, _room: &str, raw: Value) -> ClientResult<Option<Value>> {
    Ok(Some(unique(build_users(world, "users", raw)?)))
}

fn djs(world: &mut World, _room: &str, raw: Value) -> ClientResult<Option<Value>> {
    Ok(Some(unique(build_users(world, "djs", raw)?)))
}

fn moderators(world: &mut World, _room: &str, raw: Value) -> ClientResult<Option<Value>> {
    Ok(Some(unique(build_users(world, "moderators", raw)?)))
}

fn current_dj(world: &mut World, _room: &str, raw: Value) -> ClientResult<Option<Value>> {
    if raw.is_null() {
        return Ok(Some(Value::Null));
    }
    build_user(world, "current_dj", raw).map(|id| Some(Value::String(id)))
}

fn current_song(world: &mut World, room: &str, raw: Value) -> ClientResult<Option<Value>> {
    let attrs = match raw {
        Value::Null => return Ok(Some(Value::Null)),
        Value::Object(attrs) => flatten_metadata(attrs),
        other => {
            let mut attrs = Attributes::new();
            attrs.insert("_id".into(), other);
            attrs
        }
    };
    let id = Song::id_in(&attrs).ok_or(ClientError::Attribute {
        key: "current_song",
        expected: "a song with an id",
    })?;

    let new_play = world.room(room).and_then(Room::current_song) != Some(id.as_str());
    if new_play {
        world.ensure::<Song>(&id).reset_votes();
    }
    world.set::<Song>(&id, attrs)?;
    Ok(Some(Value::String(id)))
}

fn upvotes(world: &mut World, room: &str, raw: Value) -> ClientResult<Option<Value>> {
    forward_to_current_song(world, room, "upvotes", raw)
}

fn downvotes(world: &mut World, room: &str, raw: Value) -> ClientResult<Option<Value>> {
    forward_to_current_song(world, room, "downvotes", raw)
}

fn votelog(world: &mut World, room: &str, raw: Value) -> ClientResult<Option<Value>> {
    forward_to_current_song(world, room, "votelog", raw)
}

fn forward_to_current_song(
    world: &mut World,
    room: &str,
    key: &str,
    raw: Value,
) -> ClientResult<Option<Value>> {
    match world.room(room).and_then(Room::current_song).map(str::to_string) {
        Some(song) => {
            let mut attrs = Attributes::new();
            attrs.insert(key.to_string(), raw);
            world.set::<Song>(&song, attrs)?;
        }
        None => debug!(room, key, "Dropping vote data, no song is playing"),
    }
    Ok(None)
}

impl Resource for Room {
    const KIND: &'static str = "room";
    const ID_KEYS: &'static [&'static str] = &["roomid", "_id", "id"];

    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            store: AttributeStore::default(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn fields() -> &'static [Field] {
        FIELDS
    }

    fn store(&self) -> &AttributeStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut AttributeStore {
        &mut self.store
    }

    fn pool(world: &World) -> &HashMap<String, Self> {
        &world.rooms
    }

    fn pool_mut(world: &mut World) -> &mut HashMap<String, Self> {
        &mut world.rooms
    }

    fn load_request(_world: &World, id: &str) -> (&'static str, Attributes) {
        let mut params = Attributes::new();
        params.insert("roomid".into(), json!(id));
        params.insert("extended".into(), json!(false));
        ("room.info", params)
    }

    /// `room.info` answers with the room under `room` and its listeners
    /// alongside under `users`.
    fn load_response(mut response: Attributes) -> Attributes {
        let mut attrs = match response.remove("room") {
            Some(Value::Object(room)) => room,
            _ => Attributes::new(),
        };
        if let Some(users) = response.remove("users") {
            attrs.insert(LISTENERS.into(), users);
        }
        attrs
    }

    fn normalize(attrs: Attributes) -> Attributes {
        flatten_metadata(attrs)
    }
}

/// Room attributes carried by an event payload under `room`.
pub(crate) fn room_payload(data: &Attributes) -> ClientResult<Option<Attributes>> {
    data.get("room")
        .cloned()
        .map(|raw| value::object("room", raw))
        .transpose()
}
