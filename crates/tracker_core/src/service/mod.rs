//! Core use-case services.
//!
//! # Responsibility
//! - Combine repository reads with derived metrics.
//! - Keep the HTTP and CLI layers decoupled from storage details.

pub mod dashboard_service;
