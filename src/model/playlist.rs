//! Playlists of the client user, keyed by name.

use super::Song;
use crate::error::ClientResult;
use crate::resource::{Attributes, AttributeStore, Field, Resource, value};
use crate::state::World;
use serde_json::{Value, json};
use std::collections::HashMap;

pub(crate) const DEFAULT_PLAYLIST: &str = "default";

const FIELDS: &[Field] = &[Field::remote("songs").alias(&["list"]).with(songs)];

#[derive(Debug, Clone)]
pub struct Playlist {
    id: String,
    store: AttributeStore,
}

impl Playlist {
    pub fn name(&self) -> &str {
        &self.id
    }

    /// Song ids in queue order. Empty until the playlist is loaded.
    pub fn songs(&self) -> Vec<&str> {
        self.store.ids("songs")
    }

    pub fn position(&self, song: &str) -> Option<usize> {
        self.songs().iter().position(|id| *id == song)
    }

    /// Insert a song, clamping the index to the end of the queue.
    pub(crate) fn insert_song(&mut self, index: usize, song: &str) {
        let mut ids: Vec<String> = self.songs().into_iter().map(String::from).collect();
        ids.insert(index.min(ids.len()), song.to_string());
        self.store.insert("songs", json!(ids));
    }

    pub(crate) fn remove_song(&mut self, song: &str) {
        let mut ids: Vec<String> = self.songs().into_iter().map(String::from).collect();
        ids.retain(|id| id != song);
        self.store.insert("songs", json!(ids));
    }
}

fn songs(world: &mut World, _playlist: &str, raw: Value) -> ClientResult<Option<Value>> {
    let ids = value::list("list", raw)?
        .into_iter()
        .map(|entry| world.build::<Song>(value::object("list", entry)?))
        .collect::<ClientResult<Vec<_>>>()?;
    Ok(Some(json!(ids)))
}

impl Resource for Playlist {
    const KIND: &'static str = "playlist";
    const ID_KEYS: &'static [&'static str] = &["playlist_name", "name", "id"];

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
        &world.playlists
    }

    fn pool_mut(world: &mut World) -> &mut HashMap<String, Self> {
        &mut world.playlists
    }

    fn load_request(_world: &World, id: &str) -> (&'static str, Attributes) {
        let mut params = Attributes::new();
        params.insert("playlist_name".into(), json!(id));
        ("playlist.all", params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_builds_songs() {
        let mut world = World::new("me");
        let attrs = json!({"list": [
            {"_id": "s1", "metadata": {"song": "One"}},
            {"_id": "s2", "metadata": {"song": "Two"}}
        ]});
        world
            .set::<Playlist>(DEFAULT_PLAYLIST, attrs.as_object().cloned().unwrap())
            .unwrap();
        let playlist = world.playlist(DEFAULT_PLAYLIST).unwrap();
        assert_eq!(playlist.songs(), vec!["s1", "s2"]);
        assert_eq!(playlist.position("s2"), Some(1));
        assert_eq!(world.song("s2").unwrap().title(), Some("Two"));
    }

    #[test]
    fn insert_clamps_to_end() {
        let mut playlist = Playlist::new("default");
        playlist.insert_song(0, "a");
        playlist.insert_song(10, "b");
        playlist.insert_song(0, "c");
        assert_eq!(playlist.songs(), vec!["c", "a", "b"]);
        playlist.remove_song("a");
        assert_eq!(playlist.songs(), vec!["c", "b"]);
    }
}
