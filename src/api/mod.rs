//! Remote service access.
//!
//! - `backend`: the [`CatalogApi`] and [`AuthApi`] traits
//! - `client`: [`RemoteCatalogClient`], the HTTP implementation of both
//! - `models`: request and response payloads

pub mod backend;
pub mod client;
pub mod models;

pub use backend::{AuthApi, CatalogApi};
pub use client::RemoteCatalogClient;
