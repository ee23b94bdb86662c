//! MCP Tools
//!
//! Tool implementations for the Gulper MCP server.

pub mod meals;
pub mod plan;
pub mod profile;
pub mod progress;
pub mod status;
