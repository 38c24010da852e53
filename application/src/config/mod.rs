//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`InvokerConfig`] — validation policy and solve deadline for the invoker

pub mod invoker_config;

pub use invoker_config::InvokerConfig;
