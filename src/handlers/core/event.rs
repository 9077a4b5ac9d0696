//! Constructed events.

use super::context::Context;
use super::registry::Registry;
use crate::error::{ClientError, ClientResult};
use crate::model::{Boot, Message, Snag};
use crate::resource::{Attributes, value};
use crate::telemetry::spans;
use tracing::debug;

/// One typed result of an event.
///
/// Resources are referred to by id; look them up in the
/// [`World`](crate::state::World).
#[derive(Debug, Clone, PartialEq)]
pub enum EventValue {
    Reason(String),
    Room(String),
    User(String),
    Song(String),
    /// A list delivered as a single result.
    Songs(Vec<String>),
    Message(Message),
    Boot(Boot),
    Snag(Snag),
}

/// What a typecast produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Cast {
    None,
    One(EventValue),
    Many(Vec<EventValue>),
}

impl Cast {
    /// Normalize into an ordered result list.
    pub fn into_results(self) -> Vec<EventValue> {
        match self {
            Self::None => Vec::new(),
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl From<Option<EventValue>> for Cast {
    fn from(value: Option<EventValue>) -> Self {
        value.map_or(Self::None, Self::One)
    }
}

/// An event built from one inbound message. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Event {
    command: String,
    name: &'static str,
    data: Attributes,
    results: Vec<EventValue>,
}

impl Event {
    /// Resolve the message's command and run its typecast.
    ///
    /// Fails with [`ClientError::UnknownCommand`] when nothing is registered
    /// for the command; no typecast runs in that case.
    pub fn new(registry: &Registry, data: Attributes, ctx: &mut Context<'_>) -> ClientResult<Self> {
        let command = value::str_in(&data, "command")
            .ok_or(ClientError::MissingCommand)?
            .to_string();
        let entry = *registry
            .lookup(&command)
            .ok_or_else(|| ClientError::UnknownCommand(command.clone()))?;

        let span = spans::event(&command, entry.event);
        let _enter = span.enter();
        let results = (entry.typecast)(&data, ctx)?.into_results();
        debug!(results = results.len(), "Typecast complete");

        Ok(Self {
            command,
            name: entry.event,
            data,
            results,
        })
    }

    /// Protocol command the event was built from.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Registered event name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn data(&self) -> &Attributes {
        &self.data
    }

    pub fn results(&self) -> &[EventValue] {
        &self.results
    }

    pub fn into_results(self) -> std::vec::IntoIter<EventValue> {
        self.results.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Session, World};
    use serde_json::json;

    fn two_users(_data: &Attributes, _ctx: &mut Context<'_>) -> ClientResult<Cast> {
        Ok(Cast::Many(vec![
            EventValue::User("a".into()),
            EventValue::User("b".into()),
        ]))
    }

    fn one_room(_data: &Attributes, _ctx: &mut Context<'_>) -> ClientResult<Cast> {
        Ok(Cast::One(EventValue::Room("r1".into())))
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register("pair", "paired", two_users).unwrap();
        registry.register("single", "singled", one_room).unwrap();
        registry
    }

    fn build(registry: &Registry, data: serde_json::Value) -> ClientResult<Event> {
        let mut world = World::new("me");
        let mut session = Session::default();
        let mut ctx = Context::new(&mut world, &mut session, registry);
        Event::new(registry, data.as_object().cloned().unwrap(), &mut ctx)
    }

    #[test]
    fn scalar_results_become_one_element_lists() {
        let event = build(&registry(), json!({"command": "single"})).unwrap();
        assert_eq!(event.name(), "singled");
        assert_eq!(event.results(), &[EventValue::Room("r1".into())]);
    }

    #[test]
    fn sequence_results_keep_order() {
        let event = build(&registry(), json!({"command": "pair", "x": 1})).unwrap();
        assert_eq!(event.command(), "pair");
        assert_eq!(event.data().get("x"), Some(&json!(1)));
        let results: Vec<_> = event.into_results().collect();
        assert_eq!(results, vec![EventValue::User("a".into()), EventValue::User("b".into())]);
    }

    #[test]
    fn unknown_command_builds_nothing() {
        let err = build(&registry(), json!({"command": "bogus"})).unwrap_err();
        assert!(matches!(err, ClientError::UnknownCommand(ref c) if c == "bogus"));
    }

    #[test]
    fn missing_command_is_rejected() {
        let err = build(&registry(), json!({"msgid": 3})).unwrap_err();
        assert!(matches!(err, ClientError::MissingCommand));
    }

    #[test]
    fn cast_from_option() {
        assert_eq!(Cast::from(None).into_results(), Vec::<EventValue>::new());
        assert_eq!(
            Cast::from(Some(EventValue::Reason("x".into()))).into_results(),
            vec![EventValue::Reason("x".into())]
        );
    }
}
