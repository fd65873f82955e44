//! PokeAPI resource resolution
//!
//! This module turns a resource type plus a name or numeric id into a fully
//! resolved resource, consulting the local cache before the network. It also
//! provides paginated listings and a typed view over Pokémon bodies.

pub mod client;
pub mod fetch;
pub mod list;
pub mod pokemon;
pub mod resource;
pub mod resource_type;

pub use client::{ApiClient, ClientConfig, DEFAULT_TIMEOUT};
pub use fetch::{Fetch, FetchError, HttpFetcher};
pub use list::{NamedResource, Page, ResourceList};
pub use pokemon::Pokemon;
pub use resource::{NameOrId, Resource};
pub use resource_type::{ResourceType, RESOURCE_TYPES};

use thiserror::Error;

use crate::cache::CacheError;

/// Base URL for the PokeAPI v2 REST service
pub const API_URI_STUB: &str = "https://pokeapi.co/api/v2";

/// Errors that can occur when resolving PokeAPI resources
///
/// Network failures are not part of this enum: they are logged and turned
/// into an absent record so resolution can still complete.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The resource type is not one of the known PokeAPI endpoints
    #[error("Unknown API endpoint '{0}'")]
    UnknownResourceType(String),

    /// The identifier is neither a numeric id nor a usable name
    #[error("'{0}' could not be converted to a name or id")]
    InvalidIdentifier(String),

    /// Reading or writing the cache failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] FetchError),
}
