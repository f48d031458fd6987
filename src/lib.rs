//! Zendesk Palette - launcher extension core for searching and acting on
//! Zendesk entities (tickets, users, organizations, rules, ...).
//!
//! The host launcher owns rendering, keyboard handling, and process
//! lifecycle. This library provides everything underneath the list widget:
//! instance configuration, the authenticated REST client, the debounced
//! entity search dispatch, the per-entity action menus, and the toast queue
//! the host drains into its notification surface.

pub mod actions;
pub mod client;
pub mod config;
pub mod debounce;
pub mod deep_link;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod search;
pub mod session;
pub mod users;
