//! Cache-backed PokeAPI client
//!
//! Every lookup goes through [`ApiClient::fetch_or_load`]: the cache document
//! is consulted first, the network only on a miss, and whatever was fetched is
//! merged back into the cache before returning.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::list::{ListBody, Page, ResourceList};
use super::{ApiError, Fetch, HttpFetcher, NameOrId, Resource, ResourceType, API_URI_STUB};
use crate::cache::{CacheDocument, CacheStore, ResourceRecord};

/// Default timeout for a single HTTP request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for building an [`ApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing resource type
    pub endpoint: String,
    /// Location of the JSON cache document
    pub cache_path: PathBuf,
    /// Timeout for each HTTP request
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: API_URI_STUB.to_string(),
            cache_path: CacheStore::in_current_dir().path().to_path_buf(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Use a different API base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a different cache document
    pub fn with_cache_path(mut self, cache_path: impl Into<PathBuf>) -> Self {
        self.cache_path = cache_path.into();
        self
    }

    /// Use a different request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for resolving PokeAPI resources through the local cache
#[derive(Debug, Clone)]
pub struct ApiClient<F = HttpFetcher> {
    /// Base URL, stored without a trailing slash
    endpoint: String,
    cache: CacheStore,
    fetcher: F,
}

impl ApiClient<HttpFetcher> {
    /// Creates a client for the public PokeAPI, caching in `./cache.json`
    pub fn new() -> Result<Self, ApiError> {
        Self::from_config(&ClientConfig::default())
    }

    /// Creates a client from explicit configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let fetcher = HttpFetcher::new(config.timeout)?;
        Ok(Self::with_fetcher(
            config.endpoint.clone(),
            CacheStore::new(config.cache_path.clone()),
            fetcher,
        ))
    }
}

impl<F: Fetch> ApiClient<F> {
    /// Creates a client with a custom fetcher
    pub fn with_fetcher(endpoint: impl Into<String>, cache: CacheStore, fetcher: F) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            endpoint,
            cache,
            fetcher,
        }
    }

    /// Returns the API base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the cache store backing this client
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Returns the fetcher used for network requests
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Builds `<endpoint>/<type>/<segment>`
    pub fn resource_url(&self, resource_type: ResourceType, segment: &str) -> String {
        format!("{}/{}", resource_type.endpoint(&self.endpoint), segment)
    }

    /// Resolves a resource from its type and either its name or its id
    ///
    /// The type is validated before any cache or network access. Given an id,
    /// the name is read from the fetched body (falling back to the id itself);
    /// given a name, the id is read from the body (and may stay unknown).
    ///
    /// # Returns
    /// * `Ok(Resource)` - the resolved resource, possibly degraded if the network failed
    /// * `Err(ApiError::UnknownResourceType)` - `resource_type` is not a PokeAPI type
    /// * `Err(ApiError::InvalidIdentifier)` - the name cannot be used in a URL
    /// * `Err(ApiError::Cache)` - the cache file could not be read or written
    pub fn resolve(
        &self,
        resource_type: &str,
        name_or_id: impl Into<NameOrId>,
    ) -> Result<Resource, ApiError> {
        let resource_type: ResourceType = resource_type.parse()?;
        let name_or_id = name_or_id.into();
        name_or_id.validate()?;

        let lookup_url = self.resource_url(resource_type, &name_or_id.to_path_segment());
        let data = self.fetch_or_load(&lookup_url)?;

        let (name, id) = match name_or_id {
            NameOrId::Id(id) => {
                let name = data
                    .as_ref()
                    .and_then(|body| body.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| id.to_string());
                (name, Some(id))
            }
            NameOrId::Name(name) => {
                let id = data
                    .as_ref()
                    .and_then(|body| body.get("id"))
                    .and_then(Value::as_i64);
                (name, id)
            }
        };

        let url = self.resource_url(resource_type, &name);
        Ok(Resource {
            resource_type,
            name,
            id,
            url,
            data,
        })
    }

    /// Resolves a resource from a JSON identifier
    ///
    /// Only integers and strings are accepted as identifiers.
    pub fn resolve_value(&self, resource_type: &str, name_or_id: &Value) -> Result<Resource, ApiError> {
        // Type errors take precedence over identifier errors
        let _: ResourceType = resource_type.parse()?;
        self.resolve(resource_type, NameOrId::try_from(name_or_id)?)
    }

    /// Lists resources of one type, one page at a time
    pub fn list(&self, resource_type: &str, page: Page) -> Result<ResourceList, ApiError> {
        let resource_type: ResourceType = resource_type.parse()?;
        let url = format!("{}{}", resource_type.endpoint(&self.endpoint), page.query());
        self.list_endpoint(&url)
    }

    /// Loads a listing from an explicit URL, pagination parameters included
    ///
    /// A failed fetch yields an empty list with a count of zero.
    pub fn list_endpoint(&self, url: &str) -> Result<ResourceList, ApiError> {
        let body = match self.fetch_or_load(url)? {
            Some(value) => serde_json::from_value::<ListBody>(value).unwrap_or_else(|e| {
                warn!(url, error = %e, "listing body has unexpected shape");
                ListBody::default()
            }),
            None => ListBody::default(),
        };

        Ok(ResourceList::from_body(url.to_string(), body))
    }

    /// Returns the record for `url` from the cache, fetching it on a miss
    ///
    /// A cached body is returned without any network call. A `null` entry left
    /// by an earlier failure counts as a miss and is fetched again. Network
    /// failures are logged and produce `None`; they are never returned as errors.
    pub fn fetch_or_load(&self, url: &str) -> Result<ResourceRecord, ApiError> {
        let document = self.cache.load()?;

        match document.get(url) {
            Some(Some(body)) => {
                debug!(url, "cache hit");
                return Ok(Some(body.clone()));
            }
            Some(None) => debug!(url, "cached failure, retrying"),
            None => debug!(url, "cache miss"),
        }

        let record = match self.fetcher.get_json(url) {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url, error = %e, "failed to fetch resource");
                None
            }
        };

        let mut pending = CacheDocument::new();
        pending.insert(url.to_string(), record.clone());
        self.cache.merge_and_save(&pending)?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use serde_json::json;
    use std::cell::Cell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const BASE: &str = "https://pokeapi.co/api/v2";

    /// Serves canned bodies and counts every request
    #[derive(Default)]
    struct StubFetcher {
        responses: HashMap<String, Value>,
        calls: Cell<usize>,
    }

    impl StubFetcher {
        fn with(mut self, url: &str, body: Value) -> Self {
            self.responses.insert(url.to_string(), body);
            self
        }

        fn calls(&self) -> usize {
            self.calls.get()
        }
    }

    impl Fetch for StubFetcher {
        fn get_json(&self, url: &str) -> Result<Value, FetchError> {
            self.calls.set(self.calls.get() + 1);
            self.responses.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn gengar() -> Value {
        json!({"id": 94, "name": "gengar", "height": 15, "weight": 405})
    }

    fn create_test_client(fetcher: StubFetcher) -> (ApiClient<StubFetcher>, TempDir) {
        crate::logging::init_test();
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheStore::new(temp_dir.path().join("cache.json"));
        (ApiClient::with_fetcher(BASE, cache, fetcher), temp_dir)
    }

    #[test]
    fn test_resolve_name_reads_id_from_body() {
        let fetcher = StubFetcher::default().with(&format!("{BASE}/pokemon/gengar"), gengar());
        let (client, _temp_dir) = create_test_client(fetcher);

        let resource = client.resolve("pokemon", "gengar").expect("Resolve should succeed");

        assert_eq!(resource.id(), Some(94));
        assert_eq!(resource.name(), "gengar");
        assert_eq!(resource.url(), format!("{BASE}/pokemon/gengar"));
        assert_eq!(resource.resource_type(), ResourceType::POKEMON);
        assert_eq!(resource.data(), Some(&gengar()));
    }

    #[test]
    fn test_resolve_id_reads_name_from_body() {
        let fetcher = StubFetcher::default().with(&format!("{BASE}/pokemon/94"), gengar());
        let (client, _temp_dir) = create_test_client(fetcher);

        let resource = client.resolve("pokemon", 94i64).expect("Resolve should succeed");

        assert_eq!(resource.name(), "gengar");
        assert_eq!(resource.id(), Some(94));
        assert_eq!(resource.url(), format!("{BASE}/pokemon/gengar"));
    }

    #[test]
    fn test_resolve_id_without_name_falls_back_to_id() {
        let fetcher = StubFetcher::default().with(&format!("{BASE}/machine/1"), json!({"id": 1}));
        let (client, _temp_dir) = create_test_client(fetcher);

        let resource = client.resolve("machine", 1i64).expect("Resolve should succeed");

        assert_eq!(resource.name(), "1");
        assert_eq!(resource.url(), format!("{BASE}/machine/1"));
    }

    #[test]
    fn test_resolve_name_without_id_leaves_id_unknown() {
        let fetcher =
            StubFetcher::default().with(&format!("{BASE}/item/potion"), json!({"name": "potion"}));
        let (client, _temp_dir) = create_test_client(fetcher);

        let resource = client.resolve("item", "potion").expect("Resolve should succeed");

        assert_eq!(resource.id(), None);
        assert!(resource.data().is_some());
    }

    #[test]
    fn test_resolve_unknown_type_fails_without_network() {
        let (client, _temp_dir) = create_test_client(StubFetcher::default());

        let result = client.resolve("digimon", "agumon");

        assert!(matches!(result, Err(ApiError::UnknownResourceType(ref t)) if t == "digimon"));
        assert_eq!(client.fetcher().calls(), 0);
        assert!(!client.cache().path().exists(), "Cache should not be touched");
    }

    #[test]
    fn test_resolve_value_rejects_non_identifier() {
        let (client, _temp_dir) = create_test_client(StubFetcher::default());

        for value in [json!(9.4), json!(false), json!(null), json!({"id": 94})] {
            let result = client.resolve_value("pokemon", &value);
            assert!(matches!(result, Err(ApiError::InvalidIdentifier(_))));
        }
        assert_eq!(client.fetcher().calls(), 0);
    }

    #[test]
    fn test_resolve_value_checks_type_first() {
        let (client, _temp_dir) = create_test_client(StubFetcher::default());

        let result = client.resolve_value("digimon", &json!(1.5));

        assert!(matches!(result, Err(ApiError::UnknownResourceType(_))));
    }

    #[test]
    fn test_resolve_value_accepts_integer_and_string() {
        let fetcher = StubFetcher::default()
            .with(&format!("{BASE}/pokemon/94"), gengar())
            .with(&format!("{BASE}/pokemon/gengar"), gengar());
        let (client, _temp_dir) = create_test_client(fetcher);

        let by_id = client.resolve_value("pokemon", &json!(94)).unwrap();
        let by_name = client.resolve_value("pokemon", &json!("gengar")).unwrap();

        assert_eq!(by_id.name(), "gengar");
        assert_eq!(by_name.id(), Some(94));
    }

    #[test]
    fn test_resolving_twice_hits_network_once() {
        let fetcher = StubFetcher::default().with(&format!("{BASE}/pokemon/gengar"), gengar());
        let (client, _temp_dir) = create_test_client(fetcher);

        let first = client.resolve("pokemon", "gengar").unwrap();
        let second = client.resolve("pokemon", "gengar").unwrap();

        assert_eq!(client.fetcher().calls(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cached_body_wins_over_fresh_data() {
        let url = format!("{BASE}/pokemon/gengar");
        let fetcher = StubFetcher::default().with(&url, gengar());
        let (client, _temp_dir) = create_test_client(fetcher);
        let mut stale = CacheDocument::new();
        stale.insert(url.clone(), Some(json!({"name": "stale"})));
        client.cache().save(&stale).unwrap();

        let resource = client.resolve("pokemon", "gengar").unwrap();
        let mut fresh = CacheDocument::new();
        fresh.insert(url.clone(), Some(gengar()));
        client.cache().merge_and_save(&fresh).unwrap();

        assert_eq!(client.fetcher().calls(), 0);
        assert_eq!(resource.data(), Some(&json!({"name": "stale"})));
        assert_eq!(resource.id(), None);
        let cached = client.cache().load().unwrap();
        assert_eq!(cached[&url], Some(json!({"name": "stale"})));
    }

    #[test]
    fn test_network_failure_degrades_resolution() {
        let (client, _temp_dir) = create_test_client(StubFetcher::default());

        let resource = client.resolve("pokemon", 94i64).expect("Failure should not abort");

        assert_eq!(resource.name(), "94");
        assert_eq!(resource.id(), Some(94));
        assert!(resource.data().is_none());
        assert_eq!(resource.url(), format!("{BASE}/pokemon/94"));
    }

    #[test]
    fn test_resolve_value_negative_id_degrades() {
        let (client, _temp_dir) = create_test_client(StubFetcher::default());

        let resource = client
            .resolve_value("pokemon", &json!(-1))
            .expect("Negative id should reach the network and degrade");

        assert_eq!(resource.name(), "-1");
        assert_eq!(resource.id(), Some(-1));
        assert!(resource.data().is_none());
        assert_eq!(client.fetcher().calls(), 1);
    }

    #[test]
    fn test_network_failure_is_logged_with_url_and_error() {
        let (client, _temp_dir) = create_test_client(StubFetcher::default());

        let output = crate::logging::capture_events(|| {
            client.resolve("pokemon", "missingno").unwrap();
        });

        assert!(output.contains("failed to fetch resource"));
        assert!(output.contains(&format!("{BASE}/pokemon/missingno")));
        assert!(output.contains("HTTP 404"));
    }

    #[test]
    fn test_network_failure_is_not_cached() {
        let (client, _temp_dir) = create_test_client(StubFetcher::default());

        client.resolve("pokemon", "missingno").unwrap();
        client.resolve("pokemon", "missingno").unwrap();

        assert_eq!(client.fetcher().calls(), 2, "Failures should be retried");
        let cached = client.cache().load().unwrap();
        assert!(cached.is_empty());
    }

    #[test]
    fn test_null_cache_entry_is_fetched_again() {
        let url = format!("{BASE}/pokemon/gengar");
        let fetcher = StubFetcher::default().with(&url, gengar());
        let (client, _temp_dir) = create_test_client(fetcher);
        let mut failed = CacheDocument::new();
        failed.insert(url.clone(), None);
        client.cache().save(&failed).unwrap();

        let resource = client.resolve("pokemon", "gengar").unwrap();

        assert_eq!(client.fetcher().calls(), 1);
        assert_eq!(resource.id(), Some(94));
        assert_eq!(client.cache().load().unwrap()[&url], Some(gengar()));
    }

    #[test]
    fn test_fetch_or_load_persists_to_cache() {
        let url = format!("{BASE}/ability/levitate");
        let fetcher = StubFetcher::default().with(&url, json!({"id": 26, "name": "levitate"}));
        let (client, _temp_dir) = create_test_client(fetcher);

        let record = client.fetch_or_load(&url).unwrap();

        assert_eq!(record, Some(json!({"id": 26, "name": "levitate"})));
        let cached = client.cache().load().unwrap();
        assert_eq!(cached.get(&url), Some(&record));
    }

    #[test]
    fn test_malformed_cache_is_reported() {
        let (client, _temp_dir) = create_test_client(StubFetcher::default());
        std::fs::write(client.cache().path(), "not json").unwrap();

        let result = client.resolve("pokemon", "gengar");

        assert!(matches!(result, Err(ApiError::Cache(_))));
    }

    #[test]
    fn test_list_builds_paginated_url() {
        let url = format!("{BASE}/pokemon?limit=2&offset=2");
        let fetcher = StubFetcher::default().with(
            &url,
            json!({
                "count": 1302,
                "next": null,
                "previous": null,
                "results": [
                    {"name": "venusaur", "url": format!("{BASE}/pokemon/3/")},
                    {"name": "charmander", "url": format!("{BASE}/pokemon/4/")}
                ]
            }),
        );
        let (client, _temp_dir) = create_test_client(fetcher);

        let list = client
            .list(
                "pokemon",
                Page {
                    limit: Some(2),
                    offset: Some(2),
                },
            )
            .unwrap();

        assert_eq!(list.url(), url);
        assert_eq!(list.count(), 1302);
        let names: Vec<_> = list.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["venusaur", "charmander"]);
    }

    #[test]
    fn test_list_is_served_from_cache_second_time() {
        let url = format!("{BASE}/berry");
        let fetcher = StubFetcher::default().with(&url, json!({"count": 0, "results": []}));
        let (client, _temp_dir) = create_test_client(fetcher);

        client.list("berry", Page::default()).unwrap();
        client.list("berry", Page::default()).unwrap();

        assert_eq!(client.fetcher().calls(), 1);
    }

    #[test]
    fn test_list_failure_yields_empty_list() {
        let (client, _temp_dir) = create_test_client(StubFetcher::default());

        let list = client.list("pokemon", Page::default()).unwrap();

        assert!(list.is_empty());
        assert_eq!(list.count(), 0);
    }

    #[test]
    fn test_list_unknown_type_fails() {
        let (client, _temp_dir) = create_test_client(StubFetcher::default());

        let result = client.list("pokemons", Page::default());

        assert!(matches!(result, Err(ApiError::UnknownResourceType(_))));
        assert_eq!(client.fetcher().calls(), 0);
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let temp_dir = TempDir::new().unwrap();
        let client = ApiClient::with_fetcher(
            "https://pokeapi.co/api/v2/",
            CacheStore::new(temp_dir.path().join("cache.json")),
            StubFetcher::default(),
        );

        assert_eq!(client.endpoint(), BASE);
        assert_eq!(
            client.resource_url(ResourceType::POKEMON, "1"),
            format!("{BASE}/pokemon/1")
        );
    }

    #[test]
    fn test_client_config_defaults_and_overrides() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, API_URI_STUB);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.cache_path.ends_with("cache.json"));

        let config = config
            .with_endpoint("http://localhost:8000/api/v2")
            .with_cache_path("/tmp/poke.json")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.endpoint, "http://localhost:8000/api/v2");
        assert_eq!(config.cache_path, PathBuf::from("/tmp/poke.json"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
