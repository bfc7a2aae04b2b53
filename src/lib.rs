//! Client for the confman configuration API, plus an in-memory reference
//! backend serving the same endpoints.
//!
//! [`ConfmanClient`] returns a [`ClientError`] for every failed call;
//! [`LenientConfmanClient`] wraps it for callers that expect default values
//! instead.

pub mod api_doc;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service_path;
pub mod state;
pub mod store;

pub use client::{ClientError, ConfmanClient, LenientConfmanClient, ServicePathListing};
