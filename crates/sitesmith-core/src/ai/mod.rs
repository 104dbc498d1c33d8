//! AI provider layer
//!
//! Handles communication with Anthropic-compatible Messages APIs

pub mod client;
pub mod types;

pub use client::{AiClient, AiClientConfig, ApiError};
