//! Session end requests.

use super::core::{Cast, Context, EventValue};
use crate::error::ClientResult;
use crate::resource::{Attributes, value};
use crate::state::UNKNOWN_REASON;
use tracing::{debug, info};

/// The service asks the client to disconnect. A request scoped to another
/// room is ignored.
pub(super) fn session_end_requested(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    if let Some(room) = data.get("roomid").and_then(value::id_string) {
        if ctx.world.room_id() != Some(room.as_str()) {
            debug!(room = %room, "Ignoring session end for another room");
            return Ok(Cast::None);
        }
    }

    let reason = value::str_in(data, "reason").unwrap_or(UNKNOWN_REASON).to_string();
    info!(reason = %reason, "Session end requested");
    ctx.session.close(reason.clone());
    Ok(Cast::One(EventValue::Reason(reason)))
}
