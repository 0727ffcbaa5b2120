pub mod classify;
pub mod scope;
