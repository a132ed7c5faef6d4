mod handlers;

use axum::routing::{delete, get};
use axum::Router;

use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/books",
            get(handlers::list_books).post(handlers::create_book),
        )
        .route("/books/title/{title}", get(handlers::find_by_title))
        .route("/books/author/{author}", get(handlers::find_by_author))
        .route("/books/{id}", delete(handlers::delete_book))
}
