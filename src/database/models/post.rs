use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    /// Nullable columns read back as `None` and serialize as `null`
    pub title: Option<String>,
    pub content: Option<String>,
    #[sqlx(rename = "authorId")]
    pub author_id: i32,
}

/// Request body for create and update. Absent fields stay `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}
