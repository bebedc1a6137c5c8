//! quotevault-core - Core library for QuoteVault
//!
//! Shared models, the Supabase gateway, the local mirror store, session
//! handling and the per-screen view-models used by every QuoteVault front end.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod observable;
pub mod services;
pub mod session;
pub mod share;
pub mod util;
pub mod viewmodels;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use models::{Quote, QuoteId, QuoteWithCategory};
