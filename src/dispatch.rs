//! Outbound command calls.
//!
//! Correlating a request with its response happens on the transport, outside
//! this crate. Entity operations only depend on this contract: a synchronous
//! call that either yields the response map or fails.

use crate::error::RemoteCallError;
use crate::resource::Attributes;

pub trait Dispatcher {
    /// Send `command` with `params` and wait for the correlated response.
    fn call(&mut self, command: &str, params: Attributes) -> Result<Attributes, RemoteCallError>;
}

impl<D: Dispatcher + ?Sized> Dispatcher for &mut D {
    fn call(&mut self, command: &str, params: Attributes) -> Result<Attributes, RemoteCallError> {
        (**self).call(command, params)
    }
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    fn call(&mut self, command: &str, params: Attributes) -> Result<Attributes, RemoteCallError> {
        (**self).call(command, params)
    }
}

/// Interpret a raw response: the service reports failures in-band with
/// `success: false` and an `err` message.
pub fn check_response(command: &str, response: Attributes) -> Result<Attributes, RemoteCallError> {
    match response.get("success").and_then(serde_json::Value::as_bool) {
        Some(false) => {
            let message = response
                .get("err")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error");
            Err(RemoteCallError::new(command, message))
        }
        _ => Ok(response),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: serde_json::Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn check_response_passes_success() {
        let response = map(json!({"success": true, "room": {}}));
        assert!(check_response("room.info", response).is_ok());
    }

    #[test]
    fn check_response_reports_err_field() {
        let err = check_response("room.vote", map(json!({"success": false, "err": "no"}))).unwrap_err();
        assert_eq!(err, RemoteCallError::new("room.vote", "no"));
    }

    #[test]
    fn check_response_defaults_message() {
        let err = check_response("room.vote", map(json!({"success": false}))).unwrap_err();
        assert_eq!(err.message, "unknown error");
    }
}
