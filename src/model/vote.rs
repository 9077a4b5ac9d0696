//! Votes cast on a song.

use crate::error::{ClientError, ClientResult};
use crate::resource::value;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user: String,
    pub direction: Direction,
}

impl Vote {
    /// Parse a vote log entry, `[user_id, "up"|"down"]`.
    pub(crate) fn from_log_entry(entry: &Value) -> ClientResult<Self> {
        let invalid = ClientError::Attribute {
            key: "votelog",
            expected: "[user id, direction] pairs",
        };
        let Value::Array(pair) = entry else {
            return Err(invalid);
        };
        let user = pair.first().and_then(value::id_string);
        let direction = pair.get(1).and_then(Value::as_str).and_then(Direction::parse);
        match (user, direction) {
            (Some(user), Some(direction)) => Ok(Self { user, direction }),
            _ => Err(invalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_log_pairs() {
        let vote = Vote::from_log_entry(&json!(["u1", "down"])).unwrap();
        assert_eq!(vote.user, "u1");
        assert_eq!(vote.direction, Direction::Down);
    }

    #[test]
    fn rejects_unknown_direction() {
        assert!(Vote::from_log_entry(&json!(["u1", "sideways"])).is_err());
        assert!(Vote::from_log_entry(&json!({"u1": "up"})).is_err());
    }

    #[test]
    fn serializes_lowercase_direction() {
        let vote = Vote {
            user: "u1".into(),
            direction: Direction::Up,
        };
        assert_eq!(serde_json::to_value(&vote).unwrap(), json!({"user": "u1", "direction": "up"}));
    }
}
