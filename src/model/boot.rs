//! A user removed from a room by a moderator.

use super::{optional_id, required_id};
use crate::error::ClientResult;
use crate::resource::{Attributes, value};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Boot {
    pub user: String,
    pub moderator: Option<String>,
    pub room: Option<String>,
    pub reason: Option<String>,
    pub booted_at: DateTime<Utc>,
}

impl Boot {
    pub(crate) fn from_attributes(attrs: &Attributes) -> ClientResult<Self> {
        Ok(Self {
            user: required_id(attrs, &["userid"], "userid")?,
            moderator: optional_id(attrs, "modid"),
            room: optional_id(attrs, "roomid"),
            reason: value::str_in(attrs, "reason").map(str::to_string),
            booted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reason_is_optional() {
        let attrs = json!({"userid": "u1", "modid": "m1"});
        let boot = Boot::from_attributes(attrs.as_object().unwrap()).unwrap();
        assert_eq!(boot.moderator.as_deref(), Some("m1"));
        assert_eq!(boot.reason, None);
    }
}
