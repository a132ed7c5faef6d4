//! Pure access decisions over a [`ClaimsView`].
//!
//! Evaluation never touches I/O and never fails: a denial is an ordinary
//! value carrying the first gate that rejected the request.

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::claims::ClaimsView;

pub const SCOPE_CATALOG_READ: &str = "libros.read";
pub const SCOPE_CATALOG_WRITE: &str = "libros.write";
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_CLIENT: &str = "CLIENT";

/// Catalog operations the gateway can request a decision for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// List-style read; attribute mismatches filter records out instead of
    /// denying the request.
    ReadAny,
    /// Single-record read; attribute mismatches deny.
    ReadOne,
    /// Create or replace a record.
    Write,
    /// Remove a record.
    Delete,
}

impl Operation {
    /// The OAuth2 scope this operation requires.
    pub fn required_scope(self) -> &'static str {
        match self {
            Operation::ReadAny | Operation::ReadOne => SCOPE_CATALOG_READ,
            Operation::Write | Operation::Delete => SCOPE_CATALOG_WRITE,
        }
    }

    /// Mutations additionally require the administrator role.
    pub fn requires_admin(self) -> bool {
        matches!(self, Operation::Write | Operation::Delete)
    }
}

/// The two record attributes matched against the subject's allow-lists.
#[derive(Debug, Clone, Copy)]
pub struct ResourceAttributes<'a> {
    pub category: &'a str,
    pub author: &'a str,
}

/// Why a decision came out the way it did.
///
/// Denial reasons are serialized into 403 bodies, so the wire names are a
/// stable contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionReason {
    Ok,
    MissingScope,
    MissingRole,
    CategoryDenied,
    AuthorDenied,
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DecisionReason::Ok => "allowed",
            DecisionReason::MissingScope => "the token does not carry the required scope",
            DecisionReason::MissingRole => "the operation requires the administrator role",
            DecisionReason::CategoryDenied => "the record category is outside the allow-list",
            DecisionReason::AuthorDenied => "the record author is outside the allow-list",
        };
        f.write_str(text)
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl AccessDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: DecisionReason::Ok,
        }
    }

    pub fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }
}

/// Evaluates `operation` for `claims`, optionally against a concrete record.
///
/// Gates run in a fixed order and the first failure wins: required scope,
/// then the administrator role for mutations, then category and author
/// membership when a target record is given. Passing `None` for `target`
/// applies the coarse gates only.
pub fn decide(
    claims: &ClaimsView,
    operation: Operation,
    target: Option<&ResourceAttributes<'_>>,
) -> AccessDecision {
    if !claims.has_scope(operation.required_scope()) {
        return denied(claims, operation, DecisionReason::MissingScope);
    }
    if operation.requires_admin() && !claims.has_role(ROLE_ADMIN) {
        return denied(claims, operation, DecisionReason::MissingRole);
    }
    if let Some(target) = target {
        if !claims.allows_category(target.category) {
            return denied(claims, operation, DecisionReason::CategoryDenied);
        }
        if !claims.allows_author(target.author) {
            return denied(claims, operation, DecisionReason::AuthorDenied);
        }
    }
    AccessDecision::allow()
}

/// Filter predicate for list reads: both attribute gates must pass for the
/// record to be visible. Never surfaces a denial.
pub fn is_visible(claims: &ClaimsView, attributes: &ResourceAttributes<'_>) -> bool {
    claims.allows_category(attributes.category) && claims.allows_author(attributes.author)
}

fn denied(claims: &ClaimsView, operation: Operation, reason: DecisionReason) -> AccessDecision {
    debug!(
        "Denying {:?} for subject {}: {}",
        operation,
        claims.subject(),
        reason
    );
    AccessDecision::deny(reason)
}
