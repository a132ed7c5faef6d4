use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog record. Wire representation is camelCase JSON; `id` is omitted
/// until the store has assigned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub page_count: u32,
    pub category: String,
    pub content: String,
}

impl Book {
    pub fn new(title: &str, author: &str, page_count: u32, category: &str, content: &str) -> Self {
        Self {
            id: None,
            title: title.to_owned(),
            author: author.to_owned(),
            page_count,
            category: category.to_owned(),
            content: content.to_owned(),
        }
    }
}

/// Selector for single-record lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookKey {
    Id(i64),
    Title(String),
}
