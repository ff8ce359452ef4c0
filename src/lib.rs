// Main library entry point for Loopnest Graph.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

pub use application::{get_ir_graph, ExtractUsecase, Extraction};
pub use error::{ExtractError, Result};
