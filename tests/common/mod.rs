//! Integration test common infrastructure.
//!
//! Provides a scripted dispatcher that records every remote call, and
//! helpers for building a client that sits in a room and for collecting the
//! results delivered to subscribers.

#![allow(dead_code)]

use serde_json::{Value, json};
use spinroom::error::RemoteCallError;
use spinroom::resource::Attributes;
use spinroom::{Client, ClientConfig, Dispatcher, Event, EventValue, Registry};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const ME: &str = "me";
pub const ROOM: &str = "r1";

/// Dispatcher answering from per-command scripts. Commands without a script
/// succeed with `{"success": true}`.
#[derive(Default)]
pub struct Scripted {
    responses: HashMap<String, VecDeque<Result<Attributes, RemoteCallError>>>,
    pub calls: Vec<(String, Attributes)>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next call of `command`.
    pub fn respond(mut self, command: &str, response: Value) -> Self {
        self.responses
            .entry(command.to_string())
            .or_default()
            .push_back(Ok(attrs(response)));
        self
    }

    /// Queue a transport failure for the next call of `command`.
    pub fn fail(mut self, command: &str, message: &str) -> Self {
        self.responses
            .entry(command.to_string())
            .or_default()
            .push_back(Err(RemoteCallError::new(command, message)));
        self
    }

    pub fn commands(&self) -> Vec<&str> {
        self.calls.iter().map(|(command, _)| command.as_str()).collect()
    }

    /// Parameters of the last call to `command`.
    pub fn last(&self, command: &str) -> Option<&Attributes> {
        self.calls
            .iter()
            .rev()
            .find(|(c, _)| c == command)
            .map(|(_, params)| params)
    }
}

impl Dispatcher for Scripted {
    fn call(&mut self, command: &str, params: Attributes) -> Result<Attributes, RemoteCallError> {
        self.calls.push((command.to_string(), params));
        self.responses
            .get_mut(command)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(attrs(json!({"success": true}))))
    }
}

pub fn attrs(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A client authenticated as [`ME`] and sitting in [`ROOM`].
pub fn client(dispatcher: Scripted) -> Client<Scripted> {
    let config = ClientConfig::new(ME).with_room(ROOM);
    Client::new(config, Arc::new(Registry::standard()), dispatcher)
}

/// Process a message, panicking if construction fails.
pub fn deliver(client: &mut Client<Scripted>, message: Value) -> Vec<Event> {
    client
        .process(attrs(message))
        .unwrap_or_else(|e| panic!("processing failed: {e}"))
}

/// Subscribe to `event` and collect every result list it delivers.
pub fn record(client: &mut Client<Scripted>, event: &str) -> Arc<Mutex<Vec<Vec<EventValue>>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    client.on(event, move |_world, results| {
        sink.lock().unwrap().push(results.to_vec());
    });
    seen
}

/// Subscribe to several events and record the order they are delivered in.
pub fn record_order(client: &mut Client<Scripted>, events: &[&'static str]) -> Arc<Mutex<Vec<&'static str>>> {
    let order = Arc::new(Mutex::new(Vec::new()));
    for &event in events {
        let sink = Arc::clone(&order);
        client.on(event, move |_world, _results| sink.lock().unwrap().push(event));
    }
    order
}

/// A `newsong` message making `song` the current song, played by `dj`.
pub fn newsong(song: &str, dj: &str) -> Value {
    json!({
        "command": "newsong",
        "roomid": ROOM,
        "room": {"metadata": {
            "current_dj": dj,
            "current_song": {"_id": song, "djid": dj, "metadata": {"song": format!("Title of {song}")}},
            "upvotes": 0,
            "downvotes": 0,
            "votelog": []
        }}
    })
}

/// An `update_votes` message with the given totals and log.
pub fn update_votes(up: i64, down: i64, votelog: Value) -> Value {
    json!({
        "command": "update_votes",
        "roomid": ROOM,
        "room": {"metadata": {"upvotes": up, "downvotes": down, "votelog": votelog}}
    })
}
