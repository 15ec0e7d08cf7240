//! Domain layer for the CinemaGuide client.
//!
//! Core types independent of transport and storage: the catalog [`Movie`], the
//! authenticated [`User`] with the login/registration inputs, and the crate
//! error type.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`movie`]: Movie record
//! - [`user`]: User, credentials and registration form

pub mod error;
pub mod movie;
pub mod user;

pub use error::{CinemaError, Result};
pub use movie::Movie;
pub use user::{Credentials, Registration, User};
