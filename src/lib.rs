//! KeywordChain: a terminal client for the KeywordChain contract
//!
//! The UI thread renders ratatui cards driven by a pure session reducer;
//! RPC work runs on a Tokio worker behind [`infrastructure::runtime::RuntimeBridge`].

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod ui;
