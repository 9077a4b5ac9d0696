//! Options accepted by playlist operations.

use crate::error::{ClientError, ClientResult};
use crate::resource::Attributes;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueOptions {
    pub playlist: String,
    pub index: usize,
}

impl QueueOptions {
    /// Validate an option map. Keys outside `allowed` are rejected.
    pub fn parse(options: &Attributes, allowed: &[&str], default_playlist: &str) -> ClientResult<Self> {
        if let Some(key) = options.keys().find(|key| !allowed.contains(&key.as_str())) {
            return Err(ClientError::InvalidArgument(format!(
                "unknown option {key}, expected one of: {}",
                allowed.join(", ")
            )));
        }

        let playlist = match options.get("playlist") {
            None | Some(Value::Null) => default_playlist.to_string(),
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            Some(other) => {
                return Err(ClientError::InvalidArgument(format!(
                    "playlist must be a name, got {other}"
                )));
            }
        };
        let index = match options.get("index") {
            None | Some(Value::Null) => 0,
            Some(value) => value
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| {
                    ClientError::InvalidArgument(format!("index must be a non-negative integer, got {value}"))
                })?,
        };
        Ok(Self { playlist, index })
    }
}
