//! Claim issuance: what goes into a token minted for a subject.
//!
//! The counterpart of [`crate::claims`]. Allow-lists and roles are embedded
//! verbatim from the subject profile; `scope` is the only derived claim.

use serde_json::Value;

use crate::claims::{
    CLAIM_AUTHORS, CLAIM_CATEGORIES, CLAIM_ROLES, CLAIM_SCOPE, CLAIM_SUBJECT, ClaimSet,
};
use crate::engine::{ROLE_ADMIN, ROLE_CLIENT, SCOPE_CATALOG_READ, SCOPE_CATALOG_WRITE};

/// What the user directory knows about a subject, as far as issuance cares.
#[derive(Debug, Clone)]
pub struct SubjectProfile {
    pub roles: Vec<String>,
    pub allowed_categories: Vec<String>,
    pub allowed_authors: Vec<String>,
}

impl SubjectProfile {
    pub fn new(roles: &[&str], allowed_categories: &[&str], allowed_authors: &[&str]) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_owned()).collect();
        Self {
            roles: owned(roles),
            allowed_categories: owned(allowed_categories),
            allowed_authors: owned(allowed_authors),
        }
    }
}

/// Builds the claim set a token minted for `subject` must carry.
///
/// A profile with no recognized role yields no `scope` claim at all; the
/// engine later denies such tokens on scope membership.
pub fn issue_claims(subject: &str, profile: &SubjectProfile) -> ClaimSet {
    let mut claims = ClaimSet::new();
    claims.insert(CLAIM_SUBJECT.to_owned(), Value::String(subject.to_owned()));
    claims.insert(CLAIM_ROLES.to_owned(), string_array(&profile.roles));
    claims.insert(
        CLAIM_CATEGORIES.to_owned(),
        string_array(&profile.allowed_categories),
    );
    claims.insert(
        CLAIM_AUTHORS.to_owned(),
        string_array(&profile.allowed_authors),
    );
    if let Some(scope) = granted_scope(&profile.roles) {
        claims.insert(CLAIM_SCOPE.to_owned(), Value::String(scope));
    }
    claims
}

fn granted_scope(roles: &[String]) -> Option<String> {
    let has = |role: &str| roles.iter().any(|candidate| candidate == role);
    if has(ROLE_ADMIN) {
        Some(format!("{SCOPE_CATALOG_READ} {SCOPE_CATALOG_WRITE}"))
    } else if has(ROLE_CLIENT) {
        Some(SCOPE_CATALOG_READ.to_owned())
    } else {
        None
    }
}

fn string_array(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}
