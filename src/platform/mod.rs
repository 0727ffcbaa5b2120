pub mod client;
pub mod context;
pub mod error;
pub mod paginator;

pub use client::{PageFetcher, PageSizeHint, PlatformClient, ProfileFetcher};
pub use context::{AuthorizationContextBuilder, ContextSettings, LoginOutcome};
pub use error::{ContextError, FetchError, PaginationError};
pub use paginator::{ApiVersion, Collection, CollectionPaginator};
