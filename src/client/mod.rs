//! The client: inbound event pipeline and entity operations.
//!
//! A `Client` owns one resource graph and processes messages strictly one at
//! a time. For each message it builds an [`Event`] (plus any events the
//! typecast synthesized), then calls the subscribers registered for each
//! event name, in order.

mod options;
mod song;

pub use options::QueueOptions;
pub use song::SongApi;

use crate::config::ClientConfig;
use crate::dispatch::{Dispatcher, check_response};
use crate::error::{ClientError, ClientResult};
use crate::handlers::{Context, Event, EventValue, Registry};
use crate::model::{Playlist, Room, User};
use crate::resource::{Attributes, Resource};
use crate::state::{Session, World};
use crate::telemetry::spans;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Subscriber callback. Receives the graph after the event was applied and
/// the event's ordered results.
pub type Handler = Box<dyn FnMut(&World, &[EventValue]) + Send>;

/// Parameters of a remote call, written with `json!`.
pub(crate) fn params(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

pub struct Client<D> {
    config: ClientConfig,
    registry: Arc<Registry>,
    world: World,
    session: Session,
    dispatcher: D,
    handlers: HashMap<String, Vec<Handler>>,
}

impl<D: Dispatcher> Client<D> {
    pub fn new(config: ClientConfig, registry: Arc<Registry>, dispatcher: D) -> Self {
        let mut world = World::new(&config.user_id);
        if let Some(room) = &config.room_id {
            world.enter_room(room);
        }
        Self {
            config,
            registry,
            world,
            session: Session::default(),
            dispatcher,
            handlers: HashMap::new(),
        }
    }

    /// Register a subscriber for an event name.
    pub fn on<F>(&mut self, event: &str, handler: F)
    where
        F: FnMut(&World, &[EventValue]) + Send + 'static,
    {
        if !self.registry.produces(event) {
            warn!(event, "Subscribing to an event no registered command produces");
        }
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push(Box::new(handler));
    }

    /// Parse a JSON frame and process it.
    pub fn receive(&mut self, frame: &str) -> ClientResult<Vec<Event>> {
        let data: Attributes = serde_json::from_str(frame)?;
        self.process(data)
    }

    /// Build the event for a parsed message and notify subscribers.
    ///
    /// Returns the delivered events in delivery order: events synthesized by
    /// the typecast first, then the message's own event. Nothing is delivered
    /// if construction fails.
    pub fn process(&mut self, data: Attributes) -> ClientResult<Vec<Event>> {
        let mut ctx = Context::new(&mut self.world, &mut self.session, &self.registry);
        let event = Event::new(&self.registry, data, &mut ctx)?;
        let mut events = ctx.into_preceding();
        events.push(event);

        for event in &events {
            self.notify(event);
        }
        Ok(events)
    }

    fn notify(&mut self, event: &Event) {
        let Some(handlers) = self.handlers.get_mut(event.name()) else {
            return;
        };
        debug!(name = event.name(), subscribers = handlers.len(), "Delivering event");
        for handler in handlers.iter_mut() {
            handler(&self.world, event.results());
        }
    }

    /// Call a remote command and check the response.
    pub(crate) fn call(&mut self, command: &'static str, params: Attributes) -> ClientResult<Attributes> {
        let span = spans::remote_call(command);
        let _enter = span.enter();
        debug!("Calling remote command");
        let response = self
            .dispatcher
            .call(command, params)
            .and_then(|response| check_response(command, response))
            .inspect_err(|e| warn!(error = %e, "Remote command failed"))?;
        Ok(response)
    }

    // ------------------------------------------------------------------------
    // Room
    // ------------------------------------------------------------------------

    /// Make `room_id` the current room.
    pub fn enter_room(&mut self, room_id: &str) {
        self.world.enter_room(room_id);
    }

    pub fn leave_room(&mut self) {
        self.world.leave_room();
    }

    /// Fetch the current room's state.
    pub fn load_room(&mut self) -> ClientResult<()> {
        let room = self
            .world
            .room_id()
            .map(str::to_string)
            .ok_or_else(ClientError::no_room)?;
        self.world.load::<Room, D>(&room, &mut self.dispatcher)
    }

    // ------------------------------------------------------------------------
    // Users and playlists
    // ------------------------------------------------------------------------

    /// Fetch a user's profile unless it has been loaded already.
    pub fn ensure_user_loaded(&mut self, user_id: &str) -> ClientResult<&User> {
        self.world.ensure::<User>(user_id);
        self.world.ensure_loaded::<User, D>(user_id, &mut self.dispatcher)?;
        self.world
            .user(user_id)
            .ok_or_else(|| ClientError::State(format!("user {user_id} is unknown")))
    }

    /// Reload a user's profile.
    pub fn load_user(&mut self, user_id: &str) -> ClientResult<()> {
        self.world.load::<User, D>(user_id, &mut self.dispatcher)
    }

    /// Fetch the client user's playlist unless it has been loaded already.
    pub fn ensure_playlist_loaded(&mut self, name: &str) -> ClientResult<&Playlist> {
        self.world.ensure_loaded::<Playlist, D>(name, &mut self.dispatcher)?;
        self.world
            .playlist(name)
            .ok_or_else(|| ClientError::State(format!("playlist {name} is unknown")))
    }

    /// Read one attribute, loading the entity when the field requires it.
    pub fn attribute<R: Resource>(
        &mut self,
        id: &str,
        key: &str,
    ) -> ClientResult<Option<Value>> {
        self.world.attribute::<R, D>(id, key, &mut self.dispatcher)
    }

    // ------------------------------------------------------------------------
    // Songs
    // ------------------------------------------------------------------------

    /// Operations on one song.
    pub fn song(&mut self, song_id: &str) -> SongApi<'_, D> {
        SongApi::new(self, song_id)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }
}
