//! MotiBeam shell library
//!
//! A full-screen ambient projection shell. It boots into a menu of
//! industry verticals, hosts each one through a crash-proof loader, plays
//! ambient scenes discovered from plugin files, and routes a small set of
//! global keys the same way in every mode.

// Module declarations
pub mod config;
pub mod constants;
pub mod error;
pub mod modules;
pub mod registry;
pub mod scenes;
pub mod settings;
pub mod shortcuts;
pub mod tui;
pub mod verticals;
