//! spinroom - replay captured room traffic through the event pipeline.
//!
//! Usage: `spinroom <config.toml> [frames.jsonl]`. Frames are read one per
//! line from the file, or from stdin when no file is given.

use spinroom::config::Config;
use spinroom::dispatch::Dispatcher;
use spinroom::error::RemoteCallError;
use spinroom::resource::Attributes;
use spinroom::{Client, Registry, SessionHandle};
use std::io::Read;
use std::sync::Arc;
use tracing::{error, info};

/// Replays have no service to talk to.
struct Offline;

impl Dispatcher for Offline {
    fn call(&mut self, command: &str, _params: Attributes) -> Result<Attributes, RemoteCallError> {
        Err(RemoteCallError::new(command, "offline"))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        eprintln!("failed to load {config_path}: {e}");
        e
    })?;
    spinroom::telemetry::init(&config.logging).map_err(|e| anyhow::anyhow!(e))?;

    let frames = match args.next() {
        Some(path) => std::fs::read_to_string(&path)?,
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            input
        }
    };

    let mut client = Client::new(config.client, Arc::new(Registry::standard()), Offline);
    let names: Vec<&'static str> = client
        .registry()
        .commands()
        .into_iter()
        .filter_map(|command| client.registry().event_name(command))
        .collect();
    for name in names {
        client.on(name, move |_world, results| {
            info!(event = name, results = results.len(), "Event");
        });
    }

    let (handle, task) = SessionHandle::spawn(client);
    for line in frames.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if handle.deliver(line).await.is_err() {
            break;
        }
    }
    drop(handle);

    let client = match task.await? {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, code = e.error_code(), "Replay stopped");
            return Err(e.into());
        }
    };

    let world = client.world();
    if let Some(room) = world.current_room() {
        println!("room: {}", room.name().unwrap_or("(unnamed)"));
        println!("current song: {}", room.current_song().unwrap_or("-"));
        println!("djs: {}", room.djs().join(", "));
        println!("listeners: {}", room.listeners().len());
    }
    if let Some(reason) = client.session().close_reason() {
        println!("session closed: {reason}");
    }
    Ok(())
}
