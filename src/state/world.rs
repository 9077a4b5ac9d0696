//! The client's resource graph.
//!
//! Every entity the client knows about lives here exactly once, keyed by id.
//! Entities point at each other by id, so the graph can be mutually
//! referential without shared ownership. The World also carries the ambient
//! "current user" and "current room" ids that typecasts resolve against.
//!
//! There is a single writer: the event pipeline and entity operations all go
//! through `&mut World`.

use crate::dispatch::{Dispatcher, check_response};
use crate::error::{ClientError, ClientResult};
use crate::model::{Playlist, Room, Song, User};
use crate::resource::{self, Attributes, Resource};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Default)]
pub struct World {
    user_id: Option<String>,
    room_id: Option<String>,
    pub(crate) users: HashMap<String, User>,
    pub(crate) rooms: HashMap<String, Room>,
    pub(crate) songs: HashMap<String, Song>,
    pub(crate) playlists: HashMap<String, Playlist>,
}

impl World {
    /// Create a graph for the client authenticated as `user_id`.
    pub fn new(user_id: &str) -> Self {
        let mut world = Self {
            user_id: Some(user_id.to_string()),
            ..Self::default()
        };
        world.ensure::<User>(user_id);
        world
    }

    /// Id of the user this client is authenticated as.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Id of the room the client is currently in.
    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn enter_room(&mut self, room_id: &str) {
        self.ensure::<Room>(room_id);
        self.room_id = Some(room_id.to_string());
    }

    pub fn leave_room(&mut self) {
        self.room_id = None;
    }

    // ------------------------------------------------------------------------
    // Generic access
    // ------------------------------------------------------------------------

    pub fn get<R: Resource>(&self, id: &str) -> Option<&R> {
        R::pool(self).get(id)
    }

    /// Get the entity with `id`, creating an empty one if it is not known yet.
    pub fn ensure<R: Resource>(&mut self, id: &str) -> &mut R {
        R::pool_mut(self)
            .entry(id.to_string())
            .or_insert_with(|| R::new(id))
    }

    /// Factory: find or create the entity identified by `attrs` and merge
    /// `attrs` into it. Returns the entity id.
    pub fn build<R: Resource>(&mut self, attrs: Attributes) -> ClientResult<String> {
        let attrs = R::normalize(attrs);
        let id = R::id_in(&attrs).ok_or(ClientError::Attribute {
            key: R::KIND,
            expected: "an id",
        })?;
        self.set::<R>(&id, attrs)?;
        Ok(id)
    }

    /// Merge a partial attribute map into the entity.
    ///
    /// Raw keys are resolved against the entity's field table and applied in
    /// declaration order. Transforms run here, inside the merge. Keys the
    /// entity does not declare are ignored; unspecified fields keep their
    /// values.
    pub fn set<R: Resource>(&mut self, id: &str, attrs: Attributes) -> ClientResult<()> {
        self.ensure::<R>(id);

        let fields = R::fields();
        let mut pending: Vec<(usize, Value)> = Vec::with_capacity(attrs.len());
        for (raw, value) in R::normalize(attrs) {
            match resource::resolve(fields, &raw) {
                Some(position) => pending.push((position, value)),
                None => trace!(kind = R::KIND, id, key = %raw, "Ignoring undeclared attribute"),
            }
        }
        pending.sort_by_key(|(position, _)| *position);

        for (position, value) in pending {
            let field = &fields[position];
            let stored = match field.transform {
                Some(transform) => transform(self, id, value)?,
                None => Some(value),
            };
            if let Some(stored) = stored {
                self.ensure::<R>(id).store_mut().insert(field.key, stored);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Fetch the entity's attributes unless it has already been loaded.
    pub fn ensure_loaded<R, D>(&mut self, id: &str, dispatcher: &mut D) -> ClientResult<()>
    where
        R: Resource,
        D: Dispatcher + ?Sized,
    {
        if self.get::<R>(id).is_some_and(|r| r.store().is_loaded()) {
            return Ok(());
        }
        self.load::<R, D>(id, dispatcher)
    }

    /// Fetch the entity's attributes from the remote service and merge them,
    /// whether or not it was loaded before.
    pub fn load<R, D>(&mut self, id: &str, dispatcher: &mut D) -> ClientResult<()>
    where
        R: Resource,
        D: Dispatcher + ?Sized,
    {
        self.ensure::<R>(id);
        let (command, params) = R::load_request(self, id);
        debug!(kind = R::KIND, id, command, "Loading resource");

        let response = check_response(command, dispatcher.call(command, params)?)?;
        self.set::<R>(id, R::load_response(response))?;
        self.ensure::<R>(id).store_mut().mark_loaded();
        Ok(())
    }

    /// Read an attribute, loading the entity first when the field is
    /// load-required and the entity has not been loaded.
    pub fn attribute<R, D>(
        &mut self,
        id: &str,
        key: &str,
        dispatcher: &mut D,
    ) -> ClientResult<Option<Value>>
    where
        R: Resource,
        D: Dispatcher + ?Sized,
    {
        let field = R::fields()
            .iter()
            .find(|f| f.key == key)
            .ok_or_else(|| ClientError::InvalidArgument(format!("{} has no attribute {key}", R::KIND)))?;
        if field.remote {
            self.ensure_loaded::<R, D>(id, dispatcher)?;
        }
        Ok(self.get::<R>(id).and_then(|r| r.store().get(key)).cloned())
    }

    // ------------------------------------------------------------------------
    // Typed shortcuts
    // ------------------------------------------------------------------------

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn song(&self, id: &str) -> Option<&Song> {
        self.songs.get(id)
    }

    pub fn playlist(&self, name: &str) -> Option<&Playlist> {
        self.playlists.get(name)
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// The room the client is in.
    pub fn current_room(&self) -> Option<&Room> {
        self.room_id().and_then(|id| self.rooms.get(id))
    }

    /// Song playing in the client's room.
    pub fn current_song(&self) -> Option<&Song> {
        self.current_room()
            .and_then(Room::current_song)
            .and_then(|id| self.songs.get(id))
    }

    /// DJ of the song playing in the client's room.
    pub fn current_dj(&self) -> Option<&User> {
        self.current_room()
            .and_then(Room::current_dj)
            .and_then(|id| self.users.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteCallError;
    use serde_json::json;

    struct Canned {
        calls: Vec<String>,
        response: Result<Attributes, RemoteCallError>,
    }

    impl Dispatcher for Canned {
        fn call(&mut self, command: &str, _params: Attributes) -> Result<Attributes, RemoteCallError> {
            self.calls.push(command.to_string());
            self.response.clone()
        }
    }

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn build_deduplicates_by_id() {
        let mut world = World::new("me");
        let first = world.build::<User>(attrs(json!({"userid": "u1", "name": "Ann"}))).unwrap();
        let second = world.build::<User>(attrs(json!({"_id": "u1", "points": 4}))).unwrap();
        assert_eq!(first, second);
        assert_eq!(world.users.len(), 2);
        let user = world.user("u1").unwrap();
        assert_eq!(user.name(), Some("Ann"));
        assert_eq!(user.points(), 4);
    }

    #[test]
    fn build_without_id_fails() {
        let mut world = World::new("me");
        let err = world.build::<User>(attrs(json!({"name": "nobody"}))).unwrap_err();
        assert_eq!(err.error_code(), "invalid_attribute");
    }

    #[test]
    fn set_merges_without_touching_other_fields() {
        let mut world = World::new("me");
        world.set::<User>("me", attrs(json!({"name": "Me", "points": 10}))).unwrap();
        world.set::<User>("me", attrs(json!({"points": 11}))).unwrap();
        let me = world.user("me").unwrap();
        assert_eq!(me.name(), Some("Me"));
        assert_eq!(me.points(), 11);
    }

    #[test]
    fn remote_attribute_loads_once() {
        let mut world = World::new("me");
        let mut dispatcher = Canned {
            calls: Vec::new(),
            response: Ok(attrs(json!({"_id": "u1", "points": 7, "fans": 2}))),
        };
        world.ensure::<User>("u1");

        let points = world.attribute::<User, _>("u1", "points", &mut dispatcher).unwrap();
        let fans = world.attribute::<User, _>("u1", "fans_count", &mut dispatcher).unwrap();

        assert_eq!(points, Some(json!(7)));
        assert_eq!(fans, Some(json!(2)));
        assert_eq!(dispatcher.calls, vec!["user.get_profile"]);
        assert_eq!(world.user("u1").unwrap().store().load_count(), 1);
    }

    #[test]
    fn plain_attribute_never_loads() {
        let mut world = World::new("me");
        let mut dispatcher = Canned {
            calls: Vec::new(),
            response: Ok(Attributes::new()),
        };
        world.set::<User>("me", attrs(json!({"name": "Me"}))).unwrap();
        let name = world.attribute::<User, _>("me", "name", &mut dispatcher).unwrap();
        assert_eq!(name, Some(json!("Me")));
        assert!(dispatcher.calls.is_empty());
    }

    #[test]
    fn forced_load_always_calls() {
        let mut world = World::new("me");
        let mut dispatcher = Canned {
            calls: Vec::new(),
            response: Ok(attrs(json!({"points": 1}))),
        };
        world.load::<User, _>("me", &mut dispatcher).unwrap();
        world.load::<User, _>("me", &mut dispatcher).unwrap();
        assert_eq!(dispatcher.calls.len(), 2);
        assert_eq!(world.user("me").unwrap().store().load_count(), 2);
    }

    #[test]
    fn failed_load_propagates_and_stays_unloaded() {
        let mut world = World::new("me");
        let mut dispatcher = Canned {
            calls: Vec::new(),
            response: Err(RemoteCallError::new("user.get_profile", "no such user")),
        };
        let err = world.ensure_loaded::<User, _>("me", &mut dispatcher).unwrap_err();
        assert!(matches!(err, ClientError::RemoteCall(ref e) if e.message == "no such user"));
        assert!(!world.user("me").unwrap().store().is_loaded());
    }

    #[test]
    fn unknown_attribute_is_invalid_argument() {
        let mut world = World::new("me");
        let mut dispatcher = Canned {
            calls: Vec::new(),
            response: Ok(Attributes::new()),
        };
        let err = world.attribute::<User, _>("me", "shoe_size", &mut dispatcher).unwrap_err();
        assert_eq!(err.error_code(), "invalid_argument");
    }
}
