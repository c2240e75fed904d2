//! Shared newtypes used across the SDK.
//!
//! These types are serialization-transparent: an [`Endpoint`] serializes as
//! the bare URL string, an [`EndpointList`] as a JSON array of them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use url::Url;

use crate::error::{HttpError, SdkError};

// ─── Endpoint ────────────────────────────────────────────────────────────────

/// A GraphQL endpoint URL (e.g. `"https://api.example.com/graphql"`).
///
/// Requests are POSTed to this URL as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    /// Parse and check an endpoint URL.
    ///
    /// Only absolute `http`/`https` URLs with a host are accepted.
    pub fn parse(s: &str) -> Result<Self, SdkError> {
        let url = s.trim();
        let parsed = Url::parse(url).map_err(|e| invalid(url, &e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(url, "scheme must be http or https"));
        }
        // `Url` reads "https:///x" as host "x"; require the authority to be written out.
        let authority_missing = url
            .split_once("://")
            .map_or(true, |(_, rest)| rest.starts_with('/'));
        if authority_missing || parsed.host_str().map_or(true, str::is_empty) {
            return Err(invalid(url, "missing host"));
        }
        Ok(Self(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid(url: &str, reason: &str) -> SdkError {
    HttpError::InvalidEndpoint {
        url: url.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Endpoint {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Endpoint::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ─── EndpointList ────────────────────────────────────────────────────────────

/// Ordered, non-empty list of endpoints. Priority is list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EndpointList(Vec<Endpoint>);

impl EndpointList {
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, SdkError> {
        if endpoints.is_empty() {
            return Err(SdkError::Validation(
                "endpoint list must not be empty".to_string(),
            ));
        }
        Ok(Self(endpoints))
    }

    /// Parse every URL, keeping order.
    pub fn parse<I, S>(urls: I) -> Result<Self, SdkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let endpoints = urls
            .into_iter()
            .map(|u| Endpoint::parse(u.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(endpoints)
    }

    /// Parse a comma-separated list, ignoring blank entries.
    pub fn from_csv(value: &str) -> Result<Self, SdkError> {
        Self::parse(value.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    pub fn primary(&self) -> &Endpoint {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Endpoint> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a EndpointList {
    type Item = &'a Endpoint;
    type IntoIter = std::slice::Iter<'a, Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for EndpointList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let endpoints = Vec::<Endpoint>::deserialize(deserializer)?;
        EndpointList::new(endpoints).map_err(serde::de::Error::custom)
    }
}
