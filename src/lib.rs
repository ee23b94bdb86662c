//! Gulper Library
//!
//! Calorie target planning, meal logging and weight tracking.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod planner;
pub mod tools;
