//! A user adding the playing song to their own queue.

use super::{optional_id, required_id};
use crate::error::ClientResult;
use crate::resource::Attributes;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snag {
    pub user: String,
    pub song: Option<String>,
    pub room: Option<String>,
    pub snagged_at: DateTime<Utc>,
}

impl Snag {
    pub(crate) fn from_attributes(attrs: &Attributes) -> ClientResult<Self> {
        Ok(Self {
            user: required_id(attrs, &["userid"], "userid")?,
            song: optional_id(attrs, "song"),
            room: optional_id(attrs, "roomid"),
            snagged_at: Utc::now(),
        })
    }
}
