//! Command registry.
//!
//! The `Registry` maps protocol commands to event names and typecast
//! functions. It is built once at startup and shared by reference with every
//! client that dispatches through it.

use super::context::Context;
use super::event::Cast;
use crate::error::{ClientResult, RegistryError};
use crate::resource::Attributes;
use std::collections::HashMap;
use tracing::warn;

/// Maps raw event data plus context to typed results.
pub type Typecast = fn(&Attributes, &mut Context<'_>) -> ClientResult<Cast>;

/// Registration of one protocol command.
#[derive(Clone, Copy)]
pub struct Entry {
    pub event: &'static str,
    pub typecast: Typecast,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry").field("event", &self.event).finish()
    }
}

/// Registry of event typecasts.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<&'static str, Entry>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in event registered.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for &(command, event, typecast) in crate::handlers::STANDARD {
            if let Err(e) = registry.register(command, event, typecast) {
                warn!(error = %e, "Skipping built-in registration");
            }
        }
        registry
    }

    /// Register a typecast for a protocol command.
    ///
    /// Registrations are append-only: a command that is already registered
    /// is rejected and the existing entry kept.
    pub fn register(
        &mut self,
        command: &'static str,
        event: &'static str,
        typecast: Typecast,
    ) -> Result<(), RegistryError> {
        if let Some(existing) = self.entries.get(command) {
            return Err(RegistryError::DuplicateCommand {
                command,
                event: existing.event,
            });
        }
        self.entries.insert(command, Entry { event, typecast });
        Ok(())
    }

    /// Whether a typecast is registered for `command`.
    pub fn contains(&self, command: &str) -> bool {
        self.entries.contains_key(command)
    }

    pub fn lookup(&self, command: &str) -> Option<&Entry> {
        self.entries.get(command)
    }

    /// Event name registered for `command`.
    pub fn event_name(&self, command: &str) -> Option<&'static str> {
        self.entries.get(command).map(|entry| entry.event)
    }

    /// Whether any registered command produces the event `name`.
    pub fn produces(&self, name: &str) -> bool {
        self.entries.values().any(|entry| entry.event == name)
    }

    /// Registered commands, sorted.
    pub fn commands(&self) -> Vec<&'static str> {
        let mut commands: Vec<_> = self.entries.keys().copied().collect();
        commands.sort_unstable();
        commands
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nothing(_data: &Attributes, _ctx: &mut Context<'_>) -> ClientResult<Cast> {
        Ok(Cast::None)
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        assert!(!registry.contains("ping"));
        registry.register("ping", "pinged", nothing).unwrap();
        assert!(registry.contains("ping"));
        assert_eq!(registry.event_name("ping"), Some("pinged"));
    }

    #[test]
    fn test_duplicate_command_rejected() {
        let mut registry = Registry::new();
        registry.register("ping", "pinged", nothing).unwrap();
        let err = registry.register("ping", "other", nothing).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateCommand {
                command: "ping",
                event: "pinged"
            }
        );
        assert_eq!(registry.event_name("ping"), Some("pinged"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_standard_table_has_no_duplicates() {
        let registry = Registry::standard();
        assert_eq!(registry.len(), crate::handlers::STANDARD.len());
    }

    #[test]
    fn test_standard_event_names() {
        let registry = Registry::standard();
        assert_eq!(registry.event_name("killdashnine"), Some("session_end_requested"));
        assert_eq!(registry.event_name("newsong"), Some("song_started"));
        assert_eq!(registry.event_name("update_votes"), Some("song_voted"));
        assert_eq!(registry.event_name("search_complete"), Some("search_completed"));
        assert!(!registry.contains("bogus"));
        assert!(registry.produces("song_ended"));
        assert!(!registry.produces("endsong"));
    }
}
