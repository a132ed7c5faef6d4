use utoipa::OpenApi;

pub(crate) const BOOKS_TAG: &str = "Books API";
pub(crate) const AUTH_TAG: &str = "Auth API";
pub(crate) const HEALTH_TAG: &str = "Health API";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = BOOKS_TAG, description = "Catalog endpoints guarded by scope, role and attribute checks"),
        (name = AUTH_TAG, description = "Token exchange endpoints used by the browser client"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    ),
    info(
        title = "Libros API",
        description = "Book catalog resource server with attribute-based access control",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
