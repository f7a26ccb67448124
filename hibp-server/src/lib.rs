//! HTTP front end for [`hibp_verifier`], exposing its engine over the shape
//! of the public Pwned Passwords lookup API.
//!
//! This crate owns everything [`hibp_verifier::Engine`] deliberately doesn't:
//! CLI argument parsing, `tracing` setup, and the `hyper` server loop.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use config::Args;
pub use server::{serve, serve_on};
