//! First-run macOS workstation setup.
//!
//! Links dotfiles, merges the global gitignore with the github/gitignore
//! lists, installs Homebrew packages and writes `defaults` preferences, all
//! driven by TOML files in `conf/`.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: parse and validate `conf/*.toml`
//! - **[`resources`]**: idempotent `check + apply` primitives (links, preferences, packages)
//! - **[`tasks`]**: named units of work wired to resources, run in a fixed order
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `gitignore`, `link`)
//!
//! The two pieces with real logic live outside that stack:
//! [`resources::symlink`] reconciles a link idempotently and [`gitignore`]
//! merges the local ignore list with remote ones.
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod gitignore;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod platform;
pub mod resources;
pub mod tasks;
