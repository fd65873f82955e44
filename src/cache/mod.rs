//! Cache module for storing API responses to disk
//!
//! This module provides a cache store that persists every fetched PokeAPI
//! resource in one JSON document keyed by URL. Entries are merged on save and
//! never expire, so a resource is fetched from the network at most once.

mod store;

pub use store::{CacheDocument, CacheError, CacheStore, ResourceRecord, CACHE_FILE_NAME};
