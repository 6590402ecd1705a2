//! Shared types, errors, and configuration for the koperasi ledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for tenant, koperasi, user, account and journal references
//! - Pagination types for list endpoints
//! - The per-request context and role model
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token handling

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use context::{RequestContext, Role};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
