//! # libros-policy
//!
//! Attribute-based access control for the book catalog service.
//!
//! ## Components
//!
//! - **Claims:** Typed, per-request view over a verified token claim set.
//! - **Engine:** Pure decision logic combining scope, role and attribute gates.
//! - **Issuance:** Derives the claim set a subject profile is entitled to.

pub mod claims;
pub mod engine;
pub mod issuance;

pub use claims::{ClaimSet, ClaimsError, ClaimsView};
pub use engine::{
    AccessDecision, DecisionReason, Operation, ResourceAttributes, decide, is_visible,
};
pub use issuance::{SubjectProfile, issue_claims};
