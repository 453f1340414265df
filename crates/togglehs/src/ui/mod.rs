//! Terminal surface: command registration, the editor adapter, rendering and the CLI.

pub mod cli;
pub mod commands;
pub mod render;
pub mod terminal;
