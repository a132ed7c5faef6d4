use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;

use crate::api::authn_middleware::Principal;
use crate::errors::ApiError;
use crate::models::{Book, BookKey};
use crate::openapi::BOOKS_TAG;
use crate::state::AppState;

/// Lists the catalog entries the caller is allowed to see.
///
/// Entries outside the caller's category or author allow-lists are
/// filtered out rather than reported as an error.
#[utoipa::path(
    get,
    path = "/books",
    tag = BOOKS_TAG,
    responses(
        (status = 200, description = "Catalog entries visible to the caller", body = [Book]),
        (status = 401, description = "Missing or unverifiable bearer token"),
        (status = 403, description = "Caller lacks the read scope")
    )
)]
pub(super) async fn list_books(
    State(state): State<AppState>,
    Principal(claims): Principal,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.gateway.list_visible(&claims)?;
    Ok(Json(books))
}

/// Looks up a single book by title, ignoring case.
#[utoipa::path(
    get,
    path = "/books/title/{title}",
    tag = BOOKS_TAG,
    params(("title" = String, Path, description = "Title to look up, matched ignoring case")),
    responses(
        (status = 200, description = "Matching book", body = Book),
        (status = 401, description = "Missing or unverifiable bearer token"),
        (status = 403, description = "Book exists but is outside the caller's allow-lists"),
        (status = 404, description = "No book carries that title")
    )
)]
pub(super) async fn find_by_title(
    State(state): State<AppState>,
    Principal(claims): Principal,
    Path(title): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = state.gateway.find_one(&claims, &BookKey::Title(title))?;
    Ok(Json(book))
}

/// Lists books by a given author.
///
/// The author segment itself is checked against the caller's author
/// allow-list before any lookup happens, so a denied author yields 403
/// even when no such books exist.
#[utoipa::path(
    get,
    path = "/books/author/{author}",
    tag = BOOKS_TAG,
    params(("author" = String, Path, description = "Author to list, matched ignoring case")),
    responses(
        (status = 200, description = "Books by that author within the caller's categories", body = [Book]),
        (status = 401, description = "Missing or unverifiable bearer token"),
        (status = 403, description = "Author is not on the caller's allow-list")
    )
)]
pub(super) async fn find_by_author(
    State(state): State<AppState>,
    Principal(claims): Principal,
    Path(author): Path<String>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.gateway.list_by_author(&claims, &author)?;
    Ok(Json(books))
}

/// Stores a new book and returns it with its assigned id.
#[utoipa::path(
    post,
    path = "/books",
    tag = BOOKS_TAG,
    request_body = Book,
    responses(
        (status = 201, description = "Book stored", body = Book),
        (status = 401, description = "Missing or unverifiable bearer token"),
        (status = 403, description = "Caller may not write this book")
    )
)]
pub(super) async fn create_book(
    State(state): State<AppState>,
    Principal(claims): Principal,
    Json(candidate): Json<Book>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let stored = state.gateway.create(&claims, candidate)?;
    info!(
        "Subject {} stored book {:?}",
        claims.subject(),
        stored.title
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Deletes a book by id.
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = BOOKS_TAG,
    params(("id" = i64, Path, description = "Id of the book to delete")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Missing or unverifiable bearer token"),
        (status = 403, description = "Caller may not delete this book"),
        (status = 404, description = "No book carries that id")
    )
)]
pub(super) async fn delete_book(
    State(state): State<AppState>,
    Principal(claims): Principal,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.gateway.delete_by_id(&claims, id)?;
    info!("Subject {} deleted book {id}", claims.subject());
    Ok(StatusCode::NO_CONTENT)
}
