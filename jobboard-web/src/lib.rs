//! Client state layer for the job board.
//!
//! A single [`store::Store`] holds every domain slice. [`hooks`] keep it in
//! sync with the REST API through the [`query`] cache, and [`context`] wires
//! the pieces together for a browser bundle or a native client.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod context;
pub mod hooks;
pub mod query;
pub mod resource;
pub mod storage;
pub mod store;

pub use api::{ApiError, JobBoardClient};
pub use context::AppContext;
pub use hooks::{AuthHook, ResourceHook};
pub use store::{Action, AppState, Store};
