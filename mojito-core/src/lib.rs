// File: mojito-core/src/lib.rs

pub mod api;
pub mod config;
pub mod http;
pub mod persistence;
pub mod request;
pub mod routes;
pub mod services;
pub mod session;
pub mod store;

pub use mojito_common::error::Error;
pub use http::{DefaultHttpClient, HttpClient};
pub use store::{Action, StateStore, StoreHandle};
pub use session::AppSession;
