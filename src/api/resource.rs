//! Resolved PokeAPI resources and the identifiers used to look them up

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::{ApiError, ResourceType};

/// A resource identifier: either its numeric id or its name
///
/// The two are alternate keys for the same resource; resolving one yields
/// the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameOrId {
    /// Numeric resource id (e.g. `94`)
    Id(i64),
    /// Resource name (e.g. `"gengar"`)
    Name(String),
}

impl NameOrId {
    /// Returns the URL path segment for this identifier.
    pub fn to_path_segment(&self) -> String {
        match self {
            NameOrId::Id(id) => id.to_string(),
            NameOrId::Name(name) => name.clone(),
        }
    }

    /// Checks that the identifier can be placed in a resource URL.
    ///
    /// Names must be non-empty and must not contain URL structure characters.
    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        match self {
            NameOrId::Id(_) => Ok(()),
            NameOrId::Name(name) => {
                if name.is_empty() || name.contains(['/', '?', '#']) {
                    Err(ApiError::InvalidIdentifier(name.clone()))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl From<i64> for NameOrId {
    fn from(id: i64) -> Self {
        NameOrId::Id(id)
    }
}

impl From<u32> for NameOrId {
    fn from(id: u32) -> Self {
        NameOrId::Id(id.into())
    }
}

impl From<&str> for NameOrId {
    fn from(name: &str) -> Self {
        NameOrId::Name(name.to_string())
    }
}

impl From<String> for NameOrId {
    fn from(name: String) -> Self {
        NameOrId::Name(name)
    }
}

/// Parses user input: an optionally signed integer is an id, anything else a name.
impl FromStr for NameOrId {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ApiError::InvalidIdentifier(s.to_string()));
        }

        let digits = s.strip_prefix('-').unwrap_or(s);
        let parsed = if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            s.parse::<i64>()
                .map(NameOrId::Id)
                .map_err(|_| ApiError::InvalidIdentifier(s.to_string()))?
        } else {
            NameOrId::Name(s.to_string())
        };

        parsed.validate()?;
        Ok(parsed)
    }
}

/// Accepts integers and strings; every other JSON value is rejected.
impl TryFrom<&Value> for NameOrId {
    type Error = ApiError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .map(NameOrId::Id)
                .ok_or_else(|| ApiError::InvalidIdentifier(value.to_string()))?,
            Value::String(s) => NameOrId::Name(s.clone()),
            other => return Err(ApiError::InvalidIdentifier(other.to_string())),
        };

        parsed.validate()?;
        Ok(parsed)
    }
}

impl fmt::Display for NameOrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameOrId::Id(id) => write!(f, "{}", id),
            NameOrId::Name(name) => f.write_str(name),
        }
    }
}

/// A resolved resource: canonical name, id, URL and the fetched body
///
/// Built once by [`ApiClient::resolve`](super::ApiClient::resolve) and never
/// modified afterwards. When the network was unavailable the handle is still
/// produced, with the name falling back to the requested id, no id for a
/// requested name, and no body.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub(crate) resource_type: ResourceType,
    pub(crate) name: String,
    pub(crate) id: Option<i64>,
    pub(crate) url: String,
    pub(crate) data: Option<Value>,
}

impl Resource {
    /// Returns the resource type this resource was resolved under
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Returns the canonical name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the numeric id, if it could be determined
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Returns the canonical URL, `<endpoint>/<type>/<name>`
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the fetched body, if the lookup succeeded
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Returns a short developer description, `<url - name>`
    pub fn describe(&self) -> String {
        format!("<{} - {}>", self.url, self.name)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
