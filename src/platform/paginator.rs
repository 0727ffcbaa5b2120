use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::client::{PageFetcher, PageSizeHint};
use super::error::PaginationError;
use crate::types::PlatformResource;

/// Platform API generation; decides the pagination protocol and record layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V2,
    V3,
}

impl ApiVersion {
    pub fn page_size_param(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "results-per-page",
            ApiVersion::V3 => "per_page",
        }
    }

    /// Next-page locator of a page, if the collection continues
    pub fn next_locator<'a>(&self, page: &'a Value) -> Option<&'a str> {
        let next = match self {
            ApiVersion::V2 => page.get("next_url"),
            ApiVersion::V3 => page.pointer("/pagination/next/href"),
        };
        next.and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Project a raw record into `{id, name}`
    pub fn project(&self, record: &Value) -> Option<PlatformResource> {
        let (id, name) = match self {
            ApiVersion::V2 => (record.pointer("/metadata/guid"), record.pointer("/entity/name")),
            ApiVersion::V3 => (record.get("guid"), record.get("name")),
        };
        Some(PlatformResource {
            id: id?.as_str()?.to_string(),
            name: name?.as_str()?.to_string(),
        })
    }

    /// First-page URL of a collection under the platform API root
    pub fn collection_url(&self, api_uri: &Url, collection: Collection) -> Result<Url, url::ParseError> {
        let version = match self {
            ApiVersion::V2 => "v2",
            ApiVersion::V3 => "v3",
        };
        let mut base = api_uri.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(&format!("{}/{}", version, collection.path()))
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v2" | "2" => Ok(ApiVersion::V2),
            "v3" | "3" => Ok(ApiVersion::V3),
            other => Err(format!("unknown platform API version: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Organizations,
    Spaces,
}

impl Collection {
    fn path(&self) -> &'static str {
        match self {
            Collection::Organizations => "organizations",
            Collection::Spaces => "spaces",
        }
    }
}

/// Follows a collection's cursor chain and accumulates every record.
///
/// There is no page cap: iteration ends only when the platform stops
/// returning a next locator, so the platform API is trusted to terminate its
/// chains. Any failure aborts the walk; partial results are never returned.
#[derive(Debug, Clone)]
pub struct CollectionPaginator {
    version: ApiVersion,
    page_size: u32,
    api_base: Option<Url>,
}

impl CollectionPaginator {
    pub fn new(version: ApiVersion, page_size: u32) -> Self {
        Self {
            version,
            page_size,
            api_base: None,
        }
    }

    /// Root under which V2 `next_url` paths live. V2 locators are paths from
    /// the API root, so a base with a path prefix keeps that prefix.
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = Some(api_base);
        self
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    fn resolve_next(&self, current: &Url, next: &str) -> Result<Url, url::ParseError> {
        match (&self.api_base, self.version) {
            (Some(base), ApiVersion::V2) if next.starts_with('/') && !next.starts_with("//") => {
                Url::parse(&format!("{}{}", base.as_str().trim_end_matches('/'), next))
            }
            _ => current.join(next),
        }
    }

    pub async fn collect(
        &self,
        fetcher: &dyn PageFetcher,
        start: Url,
    ) -> Result<Vec<PlatformResource>, PaginationError> {
        let hint = PageSizeHint {
            param: self.version.page_size_param(),
            size: self.page_size,
        };
        let mut records = Vec::new();
        let mut pages = 0usize;
        let mut locator = Some(start);

        while let Some(current) = locator.take() {
            let page = fetcher
                .fetch_page(&current, hint)
                .await
                .map_err(|source| PaginationError::Fetch {
                    locator: current.to_string(),
                    source,
                })?;
            pages += 1;

            let resources = page
                .get("resources")
                .and_then(Value::as_array)
                .ok_or_else(|| PaginationError::MalformedPage {
                    locator: current.to_string(),
                    reason: "missing resources array".to_string(),
                })?;

            for (index, raw) in resources.iter().enumerate() {
                let record = self.version.project(raw).ok_or_else(|| PaginationError::MalformedPage {
                    locator: current.to_string(),
                    reason: format!("resource {index} lacks an id or name"),
                })?;
                records.push(record);
            }

            if let Some(next) = self.version.next_locator(&page) {
                let resolved = self.resolve_next(&current, next).map_err(|source| PaginationError::InvalidLocator {
                    locator: current.to_string(),
                    next: next.to_string(),
                    source,
                })?;
                locator = Some(resolved);
            }
        }

        tracing::debug!(pages, records = records.len(), version = ?self.version, "collection fetched");
        Ok(records)
    }
}
