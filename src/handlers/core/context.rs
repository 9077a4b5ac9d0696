//! Typecast context.
//!
//! Defines the `Context<'a>` passed to every typecast. It replaces ambient
//! "current room / current client" lookups with explicit references: the
//! resource graph (which knows the current room and user), the session and
//! the registry used for synthesized events.

use super::event::Event;
use super::registry::Registry;
use crate::error::{ClientError, ClientResult};
use crate::resource::Attributes;
use crate::state::{Session, World};
use tracing::debug;

pub struct Context<'a> {
    /// The resource graph.
    pub world: &'a mut World,
    /// Session state of the client receiving the event.
    pub session: &'a mut Session,
    registry: &'a Registry,
    preceding: Vec<Event>,
}

impl<'a> Context<'a> {
    pub fn new(world: &'a mut World, session: &'a mut Session, registry: &'a Registry) -> Self {
        Self {
            world,
            session,
            registry,
            preceding: Vec::new(),
        }
    }

    /// Id of the room the client is in.
    pub fn room_id(&self) -> ClientResult<String> {
        self.world
            .room_id()
            .map(str::to_string)
            .ok_or_else(ClientError::no_room)
    }

    /// Id of the song playing in the current room.
    pub fn current_song(&self) -> Option<String> {
        self.world
            .current_room()
            .and_then(|room| room.current_song())
            .map(str::to_string)
    }

    /// Id of the DJ playing in the current room.
    pub fn current_dj(&self) -> Option<String> {
        self.world
            .current_room()
            .and_then(|room| room.current_dj())
            .map(str::to_string)
    }

    /// Run a message generated by the client itself through the same
    /// pipeline. The resulting event is delivered before the event whose
    /// typecast synthesized it.
    pub fn synthesize(&mut self, data: Attributes) -> ClientResult<()> {
        let registry = self.registry;
        let event = Event::new(registry, data, self)?;
        debug!(command = event.command(), name = event.name(), "Synthesized event");
        self.preceding.push(event);
        Ok(())
    }

    /// Events synthesized while typecasting, in the order they ran.
    pub fn into_preceding(self) -> Vec<Event> {
        self.preceding
    }
}
