//! Command handlers for the routegen CLI.

pub mod annotate;
pub mod generate;
pub mod init;
pub mod params;
