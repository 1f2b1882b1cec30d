//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, sniff window > 0)
//! - Validate identifiers and addresses
//! - Detect duplicate limit declarations
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GuardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{uri::Authority, Method};
use thiserror::Error;

use crate::config::schema::GuardConfig;
use crate::guard::resolver::{check_identifier, RouteKey};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("limit for {route} must be a positive byte count, got {max_bytes}")]
    NonPositiveLimit { route: String, max_bytes: i64 },

    #[error("guard.default_max_bytes must be positive")]
    ZeroDefaultLimit,

    #[error("guard.sniff_bytes must be positive")]
    ZeroSniffWindow,

    #[error("{field} must not be empty")]
    EmptyIdentifier { field: &'static str },

    #[error("{field} {value:?} must not contain \"::\"")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("limit for {route} is declared more than once")]
    DuplicateLimit { route: String },

    #[error("route #{index} has an empty name")]
    EmptyRouteName { index: usize },

    #[error("route {route} has invalid method {method:?}")]
    InvalidMethod { route: String, method: String },

    #[error("{field} {value:?} is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be positive")]
    ZeroRequestTimeout,
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }
    if let Some(upstream) = &config.upstream {
        if let Err(e) = parse_upstream_authority(&upstream.address) {
            errors.push(e);
        }
    }

    if config.guard.default_max_bytes == 0 {
        errors.push(ValidationError::ZeroDefaultLimit);
    }
    if config.guard.sniff_bytes == 0 {
        errors.push(ValidationError::ZeroSniffWindow);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let default_action = config.guard.default_action.trim();
    let default_action_ok = match check_identifier("guard.default_action", default_action) {
        Ok(()) => true,
        Err(e) => {
            errors.push(e);
            false
        }
    };

    let mut declared = HashSet::new();
    for decl in &config.limits {
        let action = match decl.action.as_deref() {
            Some(action) => action.trim(),
            None if default_action_ok => default_action,
            None => continue,
        };
        let key = match RouteKey::new(decl.handler.trim(), action) {
            Ok(key) => key,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };
        if decl.max_bytes <= 0 {
            errors.push(ValidationError::NonPositiveLimit {
                route: key.to_string(),
                max_bytes: decl.max_bytes,
            });
        }
        if !declared.insert(key.to_string()) {
            errors.push(ValidationError::DuplicateLimit {
                route: key.to_string(),
            });
        }
    }

    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteName { index });
        }
        if let Some(method) = &route.method {
            if method.parse::<Method>().is_err() {
                errors.push(ValidationError::InvalidMethod {
                    route: route.name.clone(),
                    method: method.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse an upstream address (`host[:port]`) the way the forwarder uses it.
pub fn parse_upstream_authority(address: &str) -> Result<Authority, ValidationError> {
    address
        .parse::<Authority>()
        .map_err(|_| ValidationError::InvalidAddress {
            field: "upstream.address",
            value: address.to_string(),
        })
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
