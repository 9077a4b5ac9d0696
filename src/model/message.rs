//! Chat messages, spoken in a room or sent privately.

use super::{optional_id, required_id};
use crate::error::ClientResult;
use crate::resource::{Attributes, value};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// User id of the author.
    pub sender: String,
    /// Recipient user id for private messages.
    pub recipient: Option<String>,
    /// Room id for messages spoken in a room.
    pub room: Option<String>,
    pub content: String,
    pub received_at: DateTime<Utc>,
}

impl Message {
    /// Message spoken in a room: the author is `userid`.
    pub(crate) fn spoken(attrs: &Attributes) -> ClientResult<Self> {
        Ok(Self {
            sender: required_id(attrs, &["userid"], "userid")?,
            recipient: None,
            room: optional_id(attrs, "roomid"),
            content: value::str_in(attrs, "text").unwrap_or_default().to_string(),
            received_at: Utc::now(),
        })
    }

    /// Private message: the author is `senderid`, the recipient `userid`.
    pub(crate) fn private(attrs: &Attributes) -> ClientResult<Self> {
        Ok(Self {
            sender: required_id(attrs, &["senderid"], "senderid")?,
            recipient: optional_id(attrs, "userid"),
            room: None,
            content: value::str_in(attrs, "text").unwrap_or_default().to_string(),
            received_at: Utc::now(),
        })
    }

    pub fn is_private(&self) -> bool {
        self.room.is_none()
    }
}
