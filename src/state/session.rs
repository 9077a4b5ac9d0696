//! Session state mutated by typecasts.
//!
//! The transport owns the socket; this only records that the remote service
//! asked the client to end the session, and why.

/// Reason substituted when a session end request carries none.
pub const UNKNOWN_REASON: &str = "Unknown reason";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    close_reason: Option<String>,
}

impl Session {
    /// Request closure of the session.
    pub fn close(&mut self, reason: impl Into<String>) {
        self.close_reason = Some(reason.into());
    }

    pub fn is_closed(&self) -> bool {
        self.close_reason.is_some()
    }

    pub fn close_reason(&self) -> Option<&str> {
        self.close_reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_open() {
        let session = Session::default();
        assert!(!session.is_closed());
        assert_eq!(session.close_reason(), None);
    }

    #[test]
    fn close_records_reason() {
        let mut session = Session::default();
        session.close(UNKNOWN_REASON);
        assert!(session.is_closed());
        assert_eq!(session.close_reason(), Some("Unknown reason"));
    }
}
