//! Core types and definitions for the threat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, catalogs, commands, state snapshots, events, errors and
//! constants. It has no dependency on any runtime framework.

pub mod catalog;
pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod synergy;
pub mod types;

#[cfg(test)]
mod tests;
