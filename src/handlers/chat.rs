//! Room updates, chat and moderation notices.

use super::core::{Cast, Context, EventValue};
use crate::error::ClientResult;
use crate::model::{Boot, Message, Room, User, room_payload};
use crate::resource::Attributes;

/// Room settings changed. The payload may carry the room map itself or nest
/// it under `room`.
pub(super) fn room_updated(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    let room = ctx.room_id()?;
    let attrs = match room_payload(data)? {
        Some(attrs) => attrs,
        None => {
            let mut attrs = data.clone();
            attrs.remove("command");
            attrs
        }
    };
    ctx.world.set::<Room>(&room, attrs)?;
    Ok(Cast::One(EventValue::Room(room)))
}

/// Chat spoken in the room. The payload carries the speaker's name, which is
/// merged into the user.
pub(super) fn user_spoke(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    let message = Message::spoken(data)?;
    let mut speaker = Attributes::new();
    speaker.insert("userid".into(), message.sender.clone().into());
    if let Some(name) = data.get("name") {
        speaker.insert("name".into(), name.clone());
    }
    ctx.world.build::<User>(speaker)?;
    Ok(Cast::One(EventValue::Message(message)))
}

pub(super) fn message_received(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    let message = Message::private(data)?;
    ctx.world.ensure::<User>(&message.sender);
    Ok(Cast::One(EventValue::Message(message)))
}

pub(super) fn user_booted(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    let boot = Boot::from_attributes(data)?;
    ctx.world.ensure::<User>(&boot.user);
    Ok(Cast::One(EventValue::Boot(boot)))
}
