//! Typed view over the claim set of a verified bearer token.
//!
//! The claim names here are the wire contract between the issuance side
//! ([`crate::issuance`]) and the resource server. Extraction is lenient:
//! a missing or wrong-typed claim collapses to an empty set so that the
//! engine can deny on membership instead of failing the request.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

/// Verified claim set as handed over by the token verifier.
pub type ClaimSet = serde_json::Map<String, Value>;

pub const CLAIM_SUBJECT: &str = "sub";
pub const CLAIM_SCOPE: &str = "scope";
pub const CLAIM_ROLES: &str = "roles";
pub const CLAIM_CATEGORIES: &str = "categorias";
pub const CLAIM_AUTHORS: &str = "autores";

/// Issuer-side role prefix, stripped exactly once during extraction.
const ROLE_PREFIX: &str = "ROLE_";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("No authenticated principal in the request context")]
    NoPrincipal,
}

/// Immutable per-request projection of the claims the engine evaluates.
///
/// Membership checks are exact and case-sensitive; normalization is limited
/// to splitting the space-delimited `scope` claim and stripping the
/// `ROLE_` prefix from role names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsView {
    subject: String,
    scopes: HashSet<String>,
    roles: HashSet<String>,
    allowed_categories: HashSet<String>,
    allowed_authors: HashSet<String>,
}

impl ClaimsView {
    pub fn new(
        subject: &str,
        scopes: &[&str],
        roles: &[&str],
        allowed_categories: &[&str],
        allowed_authors: &[&str],
    ) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_owned()).collect();
        Self {
            subject: subject.to_owned(),
            scopes: owned(scopes),
            roles: owned(roles),
            allowed_categories: owned(allowed_categories),
            allowed_authors: owned(allowed_authors),
        }
    }

    /// Builds a view from the claim set of an already-verified token.
    ///
    /// Fails only when there is no claim set at all or no usable `sub`;
    /// every other irregularity degrades to an empty claim.
    pub fn from_claims(claims: Option<&ClaimSet>) -> Result<Self, ClaimsError> {
        let claims = claims.ok_or(ClaimsError::NoPrincipal)?;
        let subject = claims
            .get(CLAIM_SUBJECT)
            .and_then(Value::as_str)
            .filter(|sub| !sub.is_empty())
            .ok_or(ClaimsError::NoPrincipal)?
            .to_owned();

        let roles = claims
            .get(CLAIM_ROLES)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|role| role.strip_prefix(ROLE_PREFIX).unwrap_or(role).to_owned())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            subject,
            scopes: space_delimited(claims.get(CLAIM_SCOPE)),
            roles,
            allowed_categories: string_list(claims.get(CLAIM_CATEGORIES)),
            allowed_authors: string_list(claims.get(CLAIM_AUTHORS)),
        })
    }

    /// The authenticated subject (`sub` claim).
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn allows_category(&self, category: &str) -> bool {
        self.allowed_categories.contains(category)
    }

    pub fn allows_author(&self, author: &str) -> bool {
        self.allowed_authors.contains(author)
    }
}

fn space_delimited(value: Option<&Value>) -> HashSet<String> {
    value
        .and_then(Value::as_str)
        .map(|joined| joined.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}

fn string_list(value: Option<&Value>) -> HashSet<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
