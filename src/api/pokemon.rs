//! Typed view over a Pokémon resource
//!
//! Projects the commonly used fields of a `pokemon` body into named struct
//! fields, while keeping the full body available.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{ApiClient, ApiError, Fetch, NameOrId, Resource};

/// Reference to another resource inside a body (`{name, url}`)
#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    slot: u32,
    #[serde(rename = "type")]
    kind: NamedRef,
}

#[derive(Debug, Deserialize)]
struct AbilitySlot {
    slot: u32,
    ability: NamedRef,
}

#[derive(Debug, Deserialize)]
struct StatEntry {
    base_stat: u32,
    stat: NamedRef,
}

/// Fields read from a `pokemon` body; anything missing is left empty
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PokemonBody {
    height: Option<u32>,
    weight: Option<u32>,
    base_experience: Option<u32>,
    types: Vec<TypeSlot>,
    abilities: Vec<AbilitySlot>,
    stats: Vec<StatEntry>,
}

/// A Pokémon with its most used fields projected from the API body
#[derive(Debug, Clone, PartialEq)]
pub struct Pokemon {
    /// National dex id, if known
    pub id: Option<i64>,
    /// Canonical name (e.g. "gengar")
    pub name: String,
    /// Canonical resource URL
    pub url: String,
    /// Height in decimetres
    pub height: Option<u32>,
    /// Weight in hectograms
    pub weight: Option<u32>,
    /// Base experience gained for defeating it
    pub base_experience: Option<u32>,
    /// Type names, ordered by slot
    pub types: Vec<String>,
    /// Ability names, ordered by slot
    pub abilities: Vec<String>,
    /// Base stats keyed by stat name
    pub stats: BTreeMap<String, u32>,
    data: Option<Value>,
}

impl Pokemon {
    /// Resolves a Pokémon by name or national dex id
    pub fn fetch<F: Fetch>(
        client: &ApiClient<F>,
        name_or_id: impl Into<NameOrId>,
    ) -> Result<Self, ApiError> {
        let resource = client.resolve("pokemon", name_or_id)?;
        Ok(Self::from_resource(resource))
    }

    /// Projects the fields of an already resolved `pokemon` resource
    pub fn from_resource(resource: Resource) -> Self {
        let body = match &resource.data {
            Some(value) => PokemonBody::deserialize(value).unwrap_or_else(|e| {
                warn!(url = %resource.url, error = %e, "pokemon body has unexpected shape");
                PokemonBody::default()
            }),
            None => PokemonBody::default(),
        };

        let mut types = body.types;
        types.sort_by_key(|t| t.slot);
        let mut abilities = body.abilities;
        abilities.sort_by_key(|a| a.slot);

        Self {
            id: resource.id,
            name: resource.name,
            url: resource.url,
            height: body.height,
            weight: body.weight,
            base_experience: body.base_experience,
            types: types.into_iter().map(|t| t.kind.name).collect(),
            abilities: abilities.into_iter().map(|a| a.ability.name).collect(),
            stats: body
                .stats
                .into_iter()
                .map(|s| (s.stat.name, s.base_stat))
                .collect(),
            data: resource.data,
        }
    }

    /// Returns the full API body, if it was fetched
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Returns a short developer description, `<name #id at url>`
    pub fn describe(&self) -> String {
        let id = self.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
        format!("<{} #{} at {}>", self.name, id, self.url)
    }
}

impl fmt::Display for Pokemon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
