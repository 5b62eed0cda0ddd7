//! Souk Core - Shared types and marketplace logic.
//!
//! This crate provides the types and pure functions used across Souk components:
//! - `storefront` - Public storefront and seller/admin dashboard API
//! - `cli` - Operator tools (allocation dry-runs, sitemap rendering)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Everything of consequence (payments, inventory, settlements) lives
//! in the external marketplace backend; the types here mirror its payloads.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, money, roles and statuses
//! - [`models`] - DTOs mirrored from the backend REST API
//! - [`validation`] - Form rules shared by the storefront handlers
//! - [`allocation`] - Product allocation heuristic for the home page sections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod allocation;
pub mod models;
pub mod types;
pub mod validation;

pub use types::*;
