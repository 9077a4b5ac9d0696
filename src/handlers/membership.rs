//! Room membership typecasts: listeners, DJs, moderators and user updates.

use super::core::{Cast, Context, EventValue};
use crate::error::ClientResult;
use crate::model::{DJS, LISTENERS, MODERATORS, Room, User, build_user, build_users};
use crate::resource::{Attributes, value};
use serde_json::json;
use tracing::debug;

/// Users named by a payload: a `user` list, or a single `userid`.
fn users_in(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Vec<String>> {
    match data.get("user") {
        Some(users) => build_users(ctx.world, "user", users.clone()),
        None => match data.get("userid") {
            Some(id) => Ok(vec![build_user(ctx.world, "userid", id.clone())?]),
            None => Ok(Vec::new()),
        },
    }
}

fn update_members(
    data: &Attributes,
    ctx: &mut Context<'_>,
    collection: &'static str,
    join: bool,
) -> ClientResult<Cast> {
    let room = ctx.room_id()?;
    let users = users_in(data, ctx)?;
    let members = ctx.world.ensure::<Room>(&room);
    for user in &users {
        if join {
            members.add_member(collection, user);
        } else {
            members.remove_member(collection, user);
        }
    }
    debug!(room = %room, collection, join, count = users.len(), "Updated room members");
    Ok(Cast::Many(users.into_iter().map(EventValue::User).collect()))
}

pub(super) fn user_entered(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    update_members(data, ctx, LISTENERS, true)
}

pub(super) fn user_left(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    update_members(data, ctx, LISTENERS, false)
}

pub(super) fn dj_added(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    update_members(data, ctx, DJS, true)
}

pub(super) fn dj_removed(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    update_members(data, ctx, DJS, false)
}

pub(super) fn moderator_added(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    update_members(data, ctx, MODERATORS, true)
}

pub(super) fn moderator_removed(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    update_members(data, ctx, MODERATORS, false)
}

/// Profile changes. `fans` arrives as a delta, not a total.
pub(super) fn user_updated(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    let mut attrs = data.clone();
    attrs.remove("command");
    let fans_delta = attrs.remove("fans").as_ref().and_then(value::as_i64);

    let user = ctx.world.build::<User>(attrs)?;
    if let Some(delta) = fans_delta {
        let fans = ctx.world.user(&user).map_or(0, User::fans_count) + delta;
        let mut update = Attributes::new();
        update.insert("fans_count".into(), json!(fans));
        ctx.world.set::<User>(&user, update)?;
    }
    Ok(Cast::One(EventValue::User(user)))
}
