pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{
    lookup_session, Credentials, MemorySessionStore, SessionEntry, SessionStore, SessionTtl,
};
