//! blogdesk: blog administration client.
//!
//! A typed client for a posts REST API with a tag-invalidated query cache, plus
//! the form and list view models an admin front end drives.

pub mod api;
pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
