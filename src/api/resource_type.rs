//! Static list of PokeAPI resource types
//!
//! Every resource lookup is validated against this list before any cache or
//! network access happens.

use std::fmt;
use std::str::FromStr;

use super::ApiError;

/// All resource types served under the PokeAPI v2 endpoint
pub static RESOURCE_TYPES: &[&str] = &[
    "ability",
    "berry",
    "berry-firmness",
    "berry-flavor",
    "characteristic",
    "contest-effect",
    "contest-type",
    "egg-group",
    "encounter-condition",
    "encounter-condition-value",
    "encounter-method",
    "evolution-chain",
    "evolution-trigger",
    "gender",
    "generation",
    "growth-rate",
    "item",
    "item-attribute",
    "item-category",
    "item-fling-effect",
    "item-pocket",
    "language",
    "location",
    "location-area",
    "machine",
    "move",
    "move-ailment",
    "move-battle-style",
    "move-category",
    "move-damage-class",
    "move-learn-method",
    "move-target",
    "nature",
    "pal-park-area",
    "pokeathlon-stat",
    "pokedex",
    "pokemon",
    "pokemon-color",
    "pokemon-form",
    "pokemon-habitat",
    "pokemon-shape",
    "pokemon-species",
    "region",
    "stat",
    "super-contest-effect",
    "type",
    "version",
    "version-group",
];

/// A validated PokeAPI resource type
///
/// Can only be created from an entry of [`RESOURCE_TYPES`], so holding one
/// means the type has already been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceType(&'static str);

impl ResourceType {
    /// The `pokemon` resource type
    pub const POKEMON: ResourceType = ResourceType("pokemon");

    /// Returns an iterator over every known resource type.
    pub fn all() -> impl Iterator<Item = ResourceType> {
        RESOURCE_TYPES.iter().map(|name| ResourceType(*name))
    }

    /// Returns the path segment used in resource URLs.
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Returns the listing endpoint for this type under `base`.
    pub fn endpoint(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.0)
    }
}

impl FromStr for ResourceType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RESOURCE_TYPES
            .iter()
            .find(|name| **name == s)
            .map(|name| ResourceType(*name))
            .ok_or_else(|| ApiError::UnknownResourceType(s.to_string()))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
