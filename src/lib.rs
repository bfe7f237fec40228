// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Export API documentation trees to a simplified JSON format.
//!
//! This crate turns the full documentation model of an SDK (classes with
//! their methods, properties and events, plus deprecation, platform and
//! example metadata) into a reduced JSON representation meant for
//! third-party tooling such as editor completion plugins.
//!
//! # Overview
//!
//! 1. [`loader`] reads one or more JSON documentation files and merges them
//!    into a single tree
//! 2. [`parser`] turns the JSON into typed, leniently-read nodes
//! 3. [`exporter`] maps the tree onto the simplified schema in one pass
//!
//! # Example
//!
//! ```no_run
//! use apidoc_json::{exporter, loader};
//! use std::path::PathBuf;
//!
//! let files = loader::collect_input_files(&[PathBuf::from("apidoc")]);
//! let tree = loader::load_tree(&files).unwrap();
//!
//! let exported = exporter::export(&tree);
//! let json = exported.to_json(exporter::JsonStyle::Pretty).unwrap();
//! println!("{json}");
//! ```
//!
//! # Modules
//!
//! - [`parser`]: input model and lenient JSON parsing
//! - [`exporter`]: the simplified JSON schema and the mapping onto it
//! - [`loader`]: collecting and merging documentation files

#![deny(missing_docs)]

pub mod exporter;
pub mod loader;
pub mod parser;
