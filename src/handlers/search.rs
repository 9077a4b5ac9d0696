//! Song search results.

use super::core::{Cast, Context, EventValue};
use crate::error::ClientResult;
use crate::model::Song;
use crate::resource::{Attributes, value};

/// The whole result list is delivered as one value.
pub(super) fn search_completed(data: &Attributes, ctx: &mut Context<'_>) -> ClientResult<Cast> {
    let docs = data.get("docs").cloned().unwrap_or_default();
    let songs = value::list("docs", docs)?
        .into_iter()
        .map(|doc| ctx.world.build::<Song>(value::object("docs", doc)?))
        .collect::<ClientResult<Vec<_>>>()?;
    Ok(Cast::One(EventValue::Songs(songs)))
}

pub(super) fn search_failed(_data: &Attributes, _ctx: &mut Context<'_>) -> ClientResult<Cast> {
    Ok(Cast::None)
}
