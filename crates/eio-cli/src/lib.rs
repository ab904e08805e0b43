//! Library half of the `eio` command-line tool.
//!
//! `main.rs` only parses arguments and wires up logging; everything that can
//! be tested without a terminal lives here.
//!
//! ```text
//! eio
//!   ├── config     TOML settings file (log level, frame limits)
//!   └── commands   encode one frame / decode and render one frame
//! ```

/// On-disk settings for the tool.
pub mod config;

/// The `encode` and `decode` subcommands over generic readers and writers.
pub mod commands;
