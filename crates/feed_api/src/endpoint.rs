use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{FailureKind, NetworkError};

/// Sort order accepted by the photos listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Latest,
    Oldest,
    Popular,
}

impl OrderBy {
    pub const ALL: [OrderBy; 3] = [OrderBy::Latest, OrderBy::Oldest, OrderBy::Popular];

    pub fn as_query_value(self) -> &'static str {
        match self {
            OrderBy::Latest => "latest",
            OrderBy::Oldest => "oldest",
            OrderBy::Popular => "popular",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order `{0}` (expected latest, oldest or popular)")]
pub struct ParseOrderByError(String);

impl FromStr for OrderBy {
    type Err = ParseOrderByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        OrderBy::ALL
            .into_iter()
            .find(|order| order.as_query_value().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseOrderByError(trimmed.to_string()))
    }
}

/// Endpoint descriptor understood by [`crate::PhotoService`] implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotosEndpoint {
    Photos { order_by: OrderBy },
}

impl PhotosEndpoint {
    pub fn photos(order_by: OrderBy) -> Self {
        PhotosEndpoint::Photos { order_by }
    }

    pub fn order_by(&self) -> OrderBy {
        match self {
            PhotosEndpoint::Photos { order_by } => *order_by,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            PhotosEndpoint::Photos { .. } => "photos",
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            PhotosEndpoint::Photos { order_by } => {
                vec![("order_by", order_by.as_query_value().to_string())]
            }
        }
    }

    /// Resolve against `base`, keeping any path prefix the base already carries.
    pub fn url(&self, base: &str) -> Result<Url, NetworkError> {
        let mut base = Url::parse(base)
            .map_err(|err| NetworkError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(NetworkError::new(
                FailureKind::InvalidUrl,
                format!("{base} cannot be used as a base url"),
            ));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut url = base
            .join(self.path())
            .map_err(|err| NetworkError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut().extend_pairs(self.query());
        Ok(url)
    }
}
