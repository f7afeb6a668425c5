//! Command-line admin client for the GasDash REST backend.
//!
//! Lists, exports and bulk-edits orders, subscriptions and products with the
//! same filter, permission and dispatch rules the web console uses.

pub mod cli;
pub mod client;
pub mod commands;
