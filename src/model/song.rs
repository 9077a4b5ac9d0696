//! Songs.
//!
//! A song's vote log keeps one entry per user: a new vote replaces the
//! user's previous one instead of accumulating.

use super::{User, Vote, build_user, flatten_metadata};
use crate::error::ClientResult;
use crate::resource::{Attributes, AttributeStore, Field, Resource, value};
use crate::state::World;
use serde_json::{Value, json};
use std::collections::HashMap;

const FIELDS: &[Field] = &[
    Field::plain("title").alias(&["song"]),
    Field::plain("artist"),
    Field::remote("album"),
    Field::remote("genre"),
    Field::remote("length"),
    Field::remote("coverart"),
    Field::plain("source"),
    Field::plain("score"),
    Field::plain("up_votes_count").alias(&["upvotes"]),
    Field::plain("down_votes_count").alias(&["downvotes"]),
    Field::plain("votes").alias(&["votelog"]).with(record_votes),
    Field::plain("played_by").alias(&["djid"]).with(played_by),
    Field::plain("started_at").alias(&["starttime"]),
];

#[derive(Debug, Clone)]
pub struct Song {
    id: String,
    store: AttributeStore,
}

impl Song {
    pub fn title(&self) -> Option<&str> {
        self.store.str("title")
    }

    pub fn artist(&self) -> Option<&str> {
        self.store.str("artist")
    }

    pub fn album(&self) -> Option<&str> {
        self.store.str("album")
    }

    /// Length in seconds.
    pub fn length(&self) -> i64 {
        self.store.i64("length")
    }

    pub fn up_votes_count(&self) -> i64 {
        self.store.i64("up_votes_count")
    }

    pub fn down_votes_count(&self) -> i64 {
        self.store.i64("down_votes_count")
    }

    pub fn score(&self) -> Option<f64> {
        self.store.get("score").and_then(Value::as_f64)
    }

    /// User id of the DJ who played the song.
    pub fn played_by(&self) -> Option<&str> {
        self.store.str("played_by")
    }

    /// Vote log, oldest first, at most one entry per user.
    pub fn votes(&self) -> Vec<Vote> {
        self.store
            .get("votes")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Start a fresh play: no votes recorded yet.
    pub(crate) fn reset_votes(&mut self) {
        self.store.insert("votes", json!([]));
    }
}

fn record_votes(world: &mut World, song: &str, raw: Value) -> ClientResult<Option<Value>> {
    let mut log = world.get::<Song>(song).map(Song::votes).unwrap_or_default();
    for entry in value::list("votelog", raw)? {
        let vote = Vote::from_log_entry(&entry)?;
        world.ensure::<User>(&vote.user);
        log.retain(|existing| existing.user != vote.user);
        log.push(vote);
    }
    Ok(Some(serde_json::to_value(log)?))
}

fn played_by(world: &mut World, _song: &str, raw: Value) -> ClientResult<Option<Value>> {
    if raw.is_null() {
        return Ok(Some(Value::Null));
    }
    build_user(world, "played_by", raw).map(|id| Some(Value::String(id)))
}

impl Resource for Song {
    const KIND: &'static str = "song";
    const ID_KEYS: &'static [&'static str] = &["_id", "songid", "id", "fileid"];

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
        &world.songs
    }

    fn pool_mut(world: &mut World) -> &mut HashMap<String, Self> {
        &mut world.songs
    }

    fn load_request(_world: &World, id: &str) -> (&'static str, Attributes) {
        let mut params = Attributes::new();
        params.insert("songid".into(), json!(id));
        ("song.get_metadata", params)
    }

    fn normalize(attrs: Attributes) -> Attributes {
        flatten_metadata(attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn metadata_is_flattened() {
        let mut world = World::new("me");
        let id = world
            .build::<Song>(attrs(json!({
                "_id": "s1",
                "djid": "dj",
                "metadata": {"song": "Blue", "artist": "Joni", "length": 180}
            })))
            .unwrap();
        let song = world.song(&id).unwrap();
        assert_eq!(song.title(), Some("Blue"));
        assert_eq!(song.artist(), Some("Joni"));
        assert_eq!(song.length(), 180);
        assert_eq!(song.played_by(), Some("dj"));
        assert!(world.user("dj").is_some());
    }

    #[test]
    fn vote_log_replaces_duplicate_users() {
        let mut world = World::new("me");
        world.ensure::<Song>("s1");
        world.set::<Song>("s1", attrs(json!({"votelog": [["a", "up"], ["b", "up"]]}))).unwrap();
        world.set::<Song>("s1", attrs(json!({"votelog": [["a", "down"]]}))).unwrap();

        let votes = world.song("s1").unwrap().votes();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].user, "b");
        assert_eq!(votes[1], Vote { user: "a".into(), direction: Direction::Down });
    }

    #[test]
    fn duplicate_user_within_one_log_keeps_last() {
        let mut world = World::new("me");
        world
            .set::<Song>("s1", attrs(json!({"votelog": [["a", "up"], ["a", "down"]]})))
            .unwrap();
        let votes = world.song("s1").unwrap().votes();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].direction, Direction::Down);
    }

    #[test]
    fn malformed_vote_log_is_rejected() {
        let mut world = World::new("me");
        let err = world.set::<Song>("s1", attrs(json!({"votelog": 3}))).unwrap_err();
        assert_eq!(err.error_code(), "invalid_attribute");
    }
}
