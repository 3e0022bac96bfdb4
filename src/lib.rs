//! Conversational assistant for questions about public companies and stocks.
//!
//! A language model is given two tools, live market data and an encyclopedia
//! lookup, and [`orchestrator::DialogueController`] runs the model/tool loop
//! until the model answers.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod providers;
pub mod session;
pub mod tickers;
pub mod tools;
pub mod ui;

pub use error::{FinsightError, Result};
