//! Users.

use crate::resource::{Attributes, AttributeStore, Field, Resource};
use crate::state::World;
use serde_json::json;
use std::collections::HashMap;

const FIELDS: &[Field] = &[
    Field::plain("name"),
    Field::plain("avatar_id").alias(&["avatarid"]),
    Field::remote("fans_count").alias(&["fans"]),
    Field::remote("points"),
    Field::remote("acl"),
    Field::remote("laptop"),
    Field::remote("created_at").alias(&["created"]),
];

#[derive(Debug, Clone)]
pub struct User {
    id: String,
    store: AttributeStore,
}

impl User {
    pub fn name(&self) -> Option<&str> {
        self.store.str("name")
    }

    pub fn avatar_id(&self) -> i64 {
        self.store.i64("avatar_id")
    }

    pub fn fans_count(&self) -> i64 {
        self.store.i64("fans_count")
    }

    pub fn points(&self) -> i64 {
        self.store.i64("points")
    }

    /// Access level on the service; non-zero for staff.
    pub fn acl(&self) -> i64 {
        self.store.i64("acl")
    }

    pub fn laptop(&self) -> Option<&str> {
        self.store.str("laptop")
    }
}

impl Resource for User {
    const KIND: &'static str = "user";
    const ID_KEYS: &'static [&'static str] = &["_id", "userid", "id"];

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
        &world.users
    }

    fn pool_mut(world: &mut World) -> &mut HashMap<String, Self> {
        &mut world.users
    }

    fn load_request(_world: &World, id: &str) -> (&'static str, Attributes) {
        let mut params = Attributes::new();
        params.insert("userid".into(), json!(id));
        ("user.get_profile", params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_canonical_fields() {
        let mut world = World::new("me");
        let attrs = json!({"userid": "u1", "fans": 3, "avatarid": 9, "created": 1.5e9});
        world.build::<User>(attrs.as_object().cloned().unwrap()).unwrap();
        let user = world.user("u1").unwrap();
        assert_eq!(user.fans_count(), 3);
        assert_eq!(user.avatar_id(), 9);
        assert!(user.store().contains("created_at"));
    }

    #[test]
    fn load_request_targets_profile() {
        let world = World::new("me");
        let (command, params) = User::load_request(&world, "u1");
        assert_eq!(command, "user.get_profile");
        assert_eq!(params.get("userid"), Some(&json!("u1")));
    }
}
