//! Song lifecycle, votes and snags.
//!
//! Every song change first ends the song that is playing, through a
//! synthesized `endsong` message, so subscribers see each song end exactly
//! once and before its successor starts.

use super::core::{Cast, Context, EventValue};
use crate::error::{ClientError, ClientResult};
use crate::model::{Room, Snag, Song, User, flatten_metadata, room_payload};
use crate::resource::{Attributes, Resource, value};
use serde_json::{Value, json};
use tracing::debug;

fn end_current_song(ctx: &mut Context<'_>) -> ClientResult<()> {
    let Some(song) = ctx.current_song() else {
        return Ok(());
    };
    let room = ctx.room_id()?;

    let mut data = Attributes::new();
    data.insert("command".into(), json!("endsong"));
    data.insert("roomid".into(), json!(room));
    data.insert("songid".into(), json!(song));
    ctx.synthesize(data)
}

/// Check that a room state names its current song by id, before anything in
/// the graph changes.
fn check_current_song(attrs: &Attributes) -> ClientResult<()> {
    let room = flatten_metadata(attrs.clone());
    let valid = match room.get("current_song") {
        None | Some(Value::Null) => true,
        Some(Value::Object(song)) => Song::id_in(&flatten_metadata(song.clone())).is_some(),
        Some(other) => value::id_string(other).is_some(),
    };
    if !valid {
        return Err(ClientError::Attribute {
            key: "current_song",
            expected: "a song with an id",
        });
    }
    Ok(())
}

/// Apply a new room state in which the current song changes.
///
/// The payload is validated first, so a malformed message leaves the
/// playing song in place and its end is still reported later.
fn change_song(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    let room = ctx.room_id()?;
    let attrs = room_payload(data)?;
    if let Some(attrs) = &attrs {
        check_current_song(attrs)?;
    }

    end_current_song(ctx)?;
    if let Some(attrs) = attrs {
        ctx.world.set::<Room>(&room, attrs)?;
    }
    Ok(ctx.current_song().map(EventValue::Song).into())
}

pub(super) fn song_started(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    change_song(data, ctx)
}

pub(super) fn song_unavailable(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    change_song(data, ctx)
}

pub(super) fn song_blocked(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    change_song(data, ctx)
}

pub(super) fn song_limited(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    change_song(data, ctx)
}

/// The playing song finished. Clears the room's current song so the same end
/// cannot be reported twice.
pub(super) fn song_ended(_data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    let room = ctx.room_id()?;
    let song = ctx.current_song();
    if song.is_some() {
        ctx.world.ensure::<Room>(&room).clear_current_song();
    }
    Ok(song.map(EventValue::Song).into())
}

fn up_votes(ctx: &Context<'_>, song: &str) -> i64 {
    ctx.world.song(song).map_or(0, Song::up_votes_count)
}

/// Vote totals changed. The DJ earns one point per new up-vote.
pub(super) fn song_voted(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    let room = ctx.room_id()?;
    let song = ctx.current_song();
    let before = match song.as_deref() {
        Some(song) => up_votes(ctx, song),
        None => 0,
    };

    if let Some(attrs) = room_payload(data)? {
        ctx.world.set::<Room>(&room, attrs)?;
    }

    if let (Some(song), Some(dj)) = (song.as_deref(), ctx.current_dj()) {
        let delta = up_votes(ctx, song) - before;
        let points = ctx.world.user(&dj).map_or(0, User::points) + delta;
        debug!(song, dj = %dj, delta, points, "Crediting DJ for votes");

        let mut update = Attributes::new();
        update.insert("points".into(), json!(points));
        ctx.world.set::<User>(&dj, update)?;
    }
    Ok(song.map(EventValue::Song).into())
}

/// Someone added the playing song to their queue.
pub(super) fn song_snagged(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    let mut attrs = data.clone();
    if let Some(song) = ctx.current_song() {
        attrs.insert("song".into(), json!(song));
    }
    if !attrs.contains_key("roomid") {
        if let Some(room) = ctx.world.room_id() {
            attrs.insert("roomid".into(), json!(room));
        }
    }

    let snag = Snag::from_attributes(&attrs)?;
    ctx.world.ensure::<User>(&snag.user);
    debug!(room = ?snag.room, user = %snag.user, "Song snagged");
    Ok(Cast::One(EventValue::Snag(snag)))
}
