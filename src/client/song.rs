//! Operations on a song: loading, voting, skipping, snagging and playlist
//! management.

use super::{Client, QueueOptions, params};
use crate::digest;
use crate::dispatch::Dispatcher;
use crate::error::{ClientError, ClientResult};
use crate::model::{Direction, Playlist, Room, Song};
use crate::resource::{Attributes, Resource};
use serde_json::json;
use tracing::info;

const ENQUEUE_OPTIONS: &[&str] = &["playlist", "index"];
const PLAYLIST_OPTIONS: &[&str] = &["playlist"];

/// Handle for operating on one song. Obtained from [`Client::song`].
pub struct SongApi<'c, D> {
    client: &'c mut Client<D>,
    id: String,
}

impl<'c, D: Dispatcher> SongApi<'c, D> {
    pub(super) fn new(client: &'c mut Client<D>, id: &str) -> Self {
        Self {
            client,
            id: id.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fetch the song's metadata, even if it was loaded before.
    pub fn load(self) -> ClientResult<()> {
        self.client
            .world
            .load::<Song, D>(&self.id, &mut self.client.dispatcher)
    }

    /// Skip the song. Only the playing song can be skipped.
    pub fn skip(self) -> ClientResult<()> {
        let room = self.playing_in()?;
        let world = &self.client.world;
        let dj = world
            .song(&self.id)
            .and_then(Song::played_by)
            .or_else(|| world.current_room().and_then(Room::current_dj))
            .map(str::to_string);
        let section = world.room(&room).map(Room::section).unwrap_or_default();

        self.client.call(
            "room.stop_song",
            params(json!({
                "roomid": room,
                "section": section,
                "songid": self.id,
                "djid": dj,
            })),
        )?;
        info!(song = %self.id, "Skipped song");
        Ok(())
    }

    /// Vote on the song. Only the playing song can be voted on.
    pub fn vote(self, direction: Direction) -> ClientResult<()> {
        let room = self.playing_in()?;
        let section = self.client.world.room(&room).map(Room::section).unwrap_or_default();
        let direction = direction.as_str();

        self.client.call(
            "room.vote",
            params(json!({
                "roomid": room,
                "section": section,
                "val": direction,
                "songid": self.id,
                "vh": digest::vote_hash(&room, direction, &self.id),
                "th": digest::digest(&digest::nonce()),
                "ph": digest::digest(&digest::nonce()),
            })),
        )?;
        info!(song = %self.id, direction, "Voted");
        Ok(())
    }

    /// Add the playing song to the client user's queue.
    pub fn snag(self) -> ClientResult<()> {
        let room = self.playing_in()?;
        let world = &self.client.world;
        let user = world
            .user_id()
            .map(str::to_string)
            .ok_or_else(|| ClientError::State("client has no user".to_string()))?;
        let dj = world
            .current_room()
            .and_then(Room::current_dj)
            .map(str::to_string)
            .ok_or_else(|| ClientError::State("room has no current dj".to_string()))?;
        let section = world.room(&room).map(Room::section).unwrap_or_default();
        let sh = digest::digest(&digest::nonce());

        self.client.call(
            "snag.add",
            params(json!({
                "djid": dj,
                "songid": self.id,
                "roomid": room,
                "section": section,
                "site": "queue",
                "location": "board",
                "in_queue": "false",
                "blocked": "false",
                "vh": digest::snag_hash(&user, &dj, &self.id, &room, &sh),
                "sh": sh,
                "fh": digest::digest(&digest::nonce()),
            })),
        )?;
        info!(song = %self.id, "Snagged song");
        Ok(())
    }

    /// Add the song to a playlist. Options: `playlist`, `index`.
    pub fn enqueue(self, options: &Attributes) -> ClientResult<()> {
        let options = QueueOptions::parse(options, ENQUEUE_OPTIONS, &self.client.config.default_playlist)?;

        self.client.call(
            "playlist.add",
            params(json!({
                "playlist_name": options.playlist,
                "song_dict": {"fileid": self.id},
                "index": options.index,
            })),
        )?;

        self.client.world.ensure::<Song>(&self.id);
        let playlist = self.client.world.ensure::<Playlist>(&options.playlist);
        if playlist.store().is_loaded() {
            playlist.insert_song(options.index, &self.id);
        }
        Ok(())
    }

    /// Remove the song from a playlist. Options: `playlist`.
    pub fn dequeue(mut self, options: &Attributes) -> ClientResult<()> {
        let options = QueueOptions::parse(options, PLAYLIST_OPTIONS, &self.client.config.default_playlist)?;
        let index = self.position_in(&options.playlist)?;
        self.client.world.ensure::<Song>(&self.id);

        self.client.call(
            "playlist.remove",
            params(json!({
                "playlist_name": options.playlist,
                "index": index,
            })),
        )?;

        let playlist = self.client.world.ensure::<Playlist>(&options.playlist);
        if playlist.store().is_loaded() {
            playlist.remove_song(&self.id);
        }
        Ok(())
    }

    /// Move the song within a playlist. Options: `playlist`.
    pub fn move_to(mut self, to_index: usize, options: &Attributes) -> ClientResult<()> {
        let options = QueueOptions::parse(options, PLAYLIST_OPTIONS, &self.client.config.default_playlist)?;
        let from_index = self.position_in(&options.playlist)?;
        self.client.world.ensure::<Song>(&self.id);

        self.client.call(
            "playlist.reorder",
            params(json!({
                "playlist_name": options.playlist,
                "index_from": from_index,
                "index_to": to_index,
            })),
        )?;

        let playlist = self.client.world.ensure::<Playlist>(&options.playlist);
        if playlist.store().is_loaded() {
            playlist.remove_song(&self.id);
            playlist.insert_song(to_index, &self.id);
        }
        Ok(())
    }

    /// Room id, if this song is the one playing there.
    fn playing_in(&self) -> ClientResult<String> {
        let world = &self.client.world;
        let room = world.room_id().ok_or_else(ClientError::no_room)?;
        if world.current_room().and_then(Room::current_song) != Some(self.id.as_str()) {
            return Err(ClientError::not_playing());
        }
        Ok(room.to_string())
    }

    /// Index of the song in a playlist. The wire call needs the index, so the
    /// playlist is loaded if it has not been yet.
    fn position_in(&mut self, playlist: &str) -> ClientResult<usize> {
        self.client
            .world
            .ensure_loaded::<Playlist, D>(playlist, &mut self.client.dispatcher)?;
        self.client
            .world
            .playlist(playlist)
            .and_then(|p| p.position(&self.id))
            .ok_or_else(|| ClientError::State(format!("song {} is not in playlist {playlist}", self.id)))
    }
}
