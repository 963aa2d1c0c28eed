#![cfg_attr(docsrs, feature(doc_cfg))]

//! Runtime environment of a GINI instance.
//!
//! # Overview
//! This crate exposes:
//! - [`Environment`] — concurrency-safe, lazily resolved home, working,
//!   configuration and logging directories derived from a pluggable
//!   [`gini_lib::FactProvider`].
//! - [`config::Settings`] — layered settings selecting the root and log
//!   persistence, loaded from TOML and `GINI_` environment variables.
//!
//! # Examples
//! ```rust,no_run
//! use gini_env::Environment;
//!
//! let env = Environment::new();
//! println!("logs: {}", env.logging_directory().display());
//! ```
pub mod config;
pub mod env;

pub use env::Environment;
