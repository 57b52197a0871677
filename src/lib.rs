//! Single-screen arcade shooter.
//!
//! `entities` holds pure data, `compute` the per-frame round loop, and
//! `display` / `input` the terminal-facing adapters used by the binary.

pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod input;
