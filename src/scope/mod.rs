pub mod document;
pub mod error;
pub mod policy;
pub mod scoper;

pub use document::ensure_path;
pub use error::ScopeError;
pub use policy::ScopePolicy;
pub use scoper::{QueryScoper, QueryShape, TenantFields};
