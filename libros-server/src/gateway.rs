use std::sync::Arc;

use log::debug;
use thiserror::Error;

use libros_policy::{
    decide, is_visible, AccessDecision, ClaimsView, DecisionReason, Operation, ResourceAttributes,
};

use crate::errors::ApiError;
use crate::models::{Book, BookKey};
use crate::store::BookStore;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("access denied: {}", .0.reason)]
    Denied(AccessDecision),

    #[error("record not found")]
    NotFound,

    #[error("record id {0} is out of range")]
    IdOutOfRange(i64),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Denied(decision) => ApiError::denied(decision),
            GatewayError::NotFound => ApiError::not_found("book not found"),
            GatewayError::IdOutOfRange(id) => {
                ApiError::invalid_request(format!("record id {id} is out of range"))
            }
        }
    }
}

/// Per-operation orchestration over the store.
///
/// Coarse gates (scope, role) run before the store is touched; per-record
/// attribute gates run against the concrete record, as a hard check for
/// single-record operations and as a silent filter for lists.
pub struct ResourceGateway {
    store: Arc<BookStore>,
}

impl ResourceGateway {
    pub fn new(store: Arc<BookStore>) -> Self {
        Self { store }
    }

    /// Every record the caller may see. Filtering never fails; an empty
    /// result is a valid outcome.
    pub fn list_visible(&self, claims: &ClaimsView) -> Result<Vec<Book>, GatewayError> {
        self.check(decide(claims, Operation::ReadAny, None))?;

        let visible = self
            .store
            .find_all()
            .into_iter()
            .filter(|book| is_visible(claims, &attributes_of(book)))
            .collect();
        Ok(visible)
    }

    /// Single-record lookup by id or title.
    ///
    /// A record that exists but sits outside the caller's allow-lists is
    /// reported as denied, not as missing. That discloses existence to
    /// unauthorized callers and is kept as an explicit contract.
    pub fn find_one(&self, claims: &ClaimsView, key: &BookKey) -> Result<Book, GatewayError> {
        self.check(decide(claims, Operation::ReadOne, None))?;

        let book = match key {
            BookKey::Id(id) => self.store.find_by_id(*id),
            BookKey::Title(title) => self.store.find_by_title(title),
        }
        .ok_or(GatewayError::NotFound)?;

        self.check(decide(claims, Operation::ReadOne, Some(&attributes_of(&book))))?;
        Ok(book)
    }

    /// Records by the requested author.
    ///
    /// The author parameter itself is hard-checked against the allow-list
    /// before any lookup; the matches are then filtered by category.
    pub fn list_by_author(
        &self,
        claims: &ClaimsView,
        author: &str,
    ) -> Result<Vec<Book>, GatewayError> {
        self.check(decide(claims, Operation::ReadAny, None))?;

        if !claims.allows_author(author) {
            debug!(
                "Denying author search for subject {}: {author:?} is outside the allow-list",
                claims.subject()
            );
            return Err(GatewayError::Denied(AccessDecision::deny(
                DecisionReason::AuthorDenied,
            )));
        }

        let books = self
            .store
            .find_by_author(author)
            .into_iter()
            .filter(|book| claims.allows_category(&book.category))
            .collect();
        Ok(books)
    }

    /// Stores `candidate` after checking the full write chain against the
    /// candidate's own attributes. The store assigns the id when unset; an
    /// explicit id at `i64::MAX` has no successor and is refused.
    pub fn create(&self, claims: &ClaimsView, candidate: Book) -> Result<Book, GatewayError> {
        self.check(decide(
            claims,
            Operation::Write,
            Some(&attributes_of(&candidate)),
        ))?;
        if candidate.id == Some(i64::MAX) {
            return Err(GatewayError::IdOutOfRange(i64::MAX));
        }
        Ok(self.store.save(candidate))
    }

    /// Deletes by id. Coarse gates run before the record is even looked up.
    pub fn delete_by_id(&self, claims: &ClaimsView, id: i64) -> Result<(), GatewayError> {
        self.check(decide(claims, Operation::Delete, None))?;

        let book = self.store.find_by_id(id).ok_or(GatewayError::NotFound)?;
        self.check(decide(claims, Operation::Delete, Some(&attributes_of(&book))))?;

        if self.store.delete_by_id(id) {
            Ok(())
        } else {
            Err(GatewayError::NotFound)
        }
    }

    fn check(&self, decision: AccessDecision) -> Result<(), GatewayError> {
        if decision.is_allowed() {
            Ok(())
        } else {
            Err(GatewayError::Denied(decision))
        }
    }
}

fn attributes_of(book: &Book) -> ResourceAttributes<'_> {
    ResourceAttributes {
        category: &book.category,
        author: &book.author,
    }
}
