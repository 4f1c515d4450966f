//! CLI command implementations
//!
//! Each command follows a consistent pattern with dedicated Args and
//! Command structs: parse with clap, load the book, call into the engine or
//! write-side service, save when something changed.

pub mod add;
pub mod apply_bonus;
pub mod delete;
pub mod event;
pub mod init;
pub mod instrument;
pub mod portfolio;
pub mod position;
pub mod price;
pub mod report;
pub mod statement;
pub mod timeline;
pub mod transfer;
pub mod version;
