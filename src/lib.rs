//! pokewrap - a small client for the PokeAPI REST service
//!
//! Resources are looked up by type and name or numeric id, and every fetched
//! body is kept in a local JSON cache so each URL is requested at most once.
//!
//! ```no_run
//! use pokewrap::api::{ApiClient, Pokemon};
//!
//! let client = ApiClient::new()?;
//! let gengar = client.resolve("pokemon", "gengar")?;
//! assert_eq!(gengar.id(), Some(94));
//!
//! let pokemon = Pokemon::fetch(&client, 94i64)?;
//! println!("{}", pokemon.describe());
//! # Ok::<(), pokewrap::api::ApiError>(())
//! ```

pub mod api;
pub mod cache;
pub mod cli;
pub mod logging;
