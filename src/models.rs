use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Credentials and endpoints for one remote platform
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub oauth_url: String,
    pub base_url: String,
    pub audience: String,
}

impl Profile {
    /// Field values in form order
    pub fn values(&self) -> [&str; 6] {
        [
            &self.name,
            &self.client_id,
            &self.client_secret,
            &self.oauth_url,
            &self.base_url,
            &self.audience,
        ]
    }

    /// Build a profile from form values; missing trailing values become empty
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut it = values.into_iter().map(Into::into);
        let mut next = || it.next().unwrap_or_default();
        Self {
            name: next(),
            client_id: next(),
            client_secret: next(),
            oauth_url: next(),
            base_url: next(),
            audience: next(),
        }
    }
}

/// Bearer token returned by the client-credentials exchange
#[derive(Clone, PartialEq, Eq, Default)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(<{} bytes>)", self.0.len())
    }
}

// The cluster API sends `null` for unset fields
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Generation {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// Cluster as listed by the platform API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Cluster {
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub generation: Generation,
}

impl Cluster {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.generation.name)
    }
}
