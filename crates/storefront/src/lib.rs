//! Souk storefront library.
//!
//! The storefront is the server in front of the marketplace backend: it
//! holds sessions, gates dashboard routes by role, keeps the cart, serves the
//! catalogue and sitemap, and answers the support chatbot. It is a library so
//! the binary, the CLI and the tests share one router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod chatbot;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sitemap;
pub mod state;
