//! Attribute store shared by every domain entity.
//!
//! Entities are not hand-written structs with one field per protocol key.
//! Each entity type declares a static table of [`Field`] descriptors and keeps
//! its values in an [`AttributeStore`]. The [`World`](crate::state::World)
//! interprets those descriptors when merging raw protocol maps:
//!
//! - raw keys are resolved to a canonical key (exact key first, then aliases);
//! - a field's transform runs inside the same merge call, with mutable access
//!   to the graph, so it can build referenced entities or maintain nested
//!   collections;
//! - fields flagged `remote` are only available after the entity has been
//!   loaded through the dispatcher.

mod store;
pub mod value;

pub use store::AttributeStore;

use crate::error::ClientResult;
use crate::state::World;
use serde_json::Value;
use std::collections::HashMap;

/// Raw or stored attribute map.
pub type Attributes = serde_json::Map<String, Value>;

/// Per-field transform.
///
/// Receives the graph, the id of the entity being merged and the raw value.
/// Returns the value to store, or `None` when the raw value was consumed
/// elsewhere (forwarded to another entity) and nothing should be stored.
pub type Transform = fn(&mut World, &str, Value) -> ClientResult<Option<Value>>;

/// Declaration of one attribute.
#[derive(Clone, Copy)]
pub struct Field {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    pub remote: bool,
    pub transform: Option<Transform>,
}

impl Field {
    pub const fn plain(key: &'static str) -> Self {
        Self {
            key,
            aliases: &[],
            remote: false,
            transform: None,
        }
    }

    /// A field that is only populated by loading the entity.
    pub const fn remote(key: &'static str) -> Self {
        Self {
            remote: true,
            ..Self::plain(key)
        }
    }

    pub const fn alias(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    pub const fn with(self, transform: Transform) -> Self {
        Self {
            transform: Some(transform),
            ..self
        }
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("aliases", &self.aliases)
            .field("remote", &self.remote)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Resolve a raw protocol key against a field table. Returns the index of
/// the matching field.
pub fn resolve(fields: &[Field], raw: &str) -> Option<usize> {
    fields
        .iter()
        .position(|f| f.key == raw)
        .or_else(|| fields.iter().position(|f| f.aliases.contains(&raw)))
}

/// A lazily-loaded, attribute-bearing domain entity with a stable id.
pub trait Resource: Sized {
    /// Entity kind, used in logs.
    const KIND: &'static str;

    /// Raw keys that may carry the entity id, in lookup order.
    const ID_KEYS: &'static [&'static str] = &["_id", "id"];

    fn new(id: &str) -> Self;

    fn id(&self) -> &str;

    fn fields() -> &'static [Field];

    fn store(&self) -> &AttributeStore;

    fn store_mut(&mut self) -> &mut AttributeStore;

    /// The graph collection holding entities of this kind.
    fn pool(world: &World) -> &HashMap<String, Self>;

    fn pool_mut(world: &mut World) -> &mut HashMap<String, Self>;

    /// Remote command and parameters that fetch this entity's attributes.
    fn load_request(world: &World, id: &str) -> (&'static str, Attributes);

    /// Pick the attribute map out of a load response.
    fn load_response(response: Attributes) -> Attributes {
        response
    }

    /// Reshape a raw map before field resolution.
    fn normalize(attrs: Attributes) -> Attributes {
        attrs
    }

    /// Extract the id carried by a raw map, if any.
    fn id_in(attrs: &Attributes) -> Option<String> {
        Self::ID_KEYS
            .iter()
            .find_map(|key| attrs.get(*key).and_then(value::id_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[Field] = &[
        Field::plain("listeners").alias(&["users"]),
        Field::plain("listener_count").alias(&["listeners"]),
        Field::remote("points"),
    ];

    #[test]
    fn resolve_prefers_exact_key_over_alias() {
        assert_eq!(resolve(FIELDS, "listeners"), Some(0));
        assert_eq!(resolve(FIELDS, "users"), Some(0));
        assert_eq!(resolve(FIELDS, "listener_count"), Some(1));
    }

    #[test]
    fn resolve_unknown_key_is_none() {
        assert!(resolve(FIELDS, "bogus").is_none());
    }

    #[test]
    fn remote_flag_survives_builders() {
        let field = Field::remote("points").alias(&["pts"]);
        assert!(field.remote);
        assert_eq!(field.aliases, &["pts"]);
        assert!(field.transform.is_none());
    }
}
