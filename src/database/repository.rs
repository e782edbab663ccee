use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Post, PostInput};

const POST_COLUMNS: &str = r#"id, title, content, "authorId""#;

/// Post storage. Every method issues exactly one statement.
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a post owned by `author_id`. Missing fields are bound as NULL.
    pub async fn insert(&self, input: &PostInput, author_id: i32) -> Result<Post, DatabaseError> {
        let sql = format!(
            r#"INSERT INTO "Post" (title, content, "authorId") VALUES ($1, $2, $3) RETURNING {}"#,
            POST_COLUMNS
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(input.title.as_deref())
            .bind(input.content.as_deref())
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(post)
    }

    /// Update title/content of the post matching both `id` and `author_id`.
    /// Absent fields keep their stored value. Zero matching rows is `NotFound`.
    pub async fn update_owned(&self, id: i32, author_id: i32, input: &PostInput) -> Result<Post, DatabaseError> {
        let sql = format!(
            r#"UPDATE "Post" SET title = COALESCE($3, title), content = COALESCE($4, content)
               WHERE id = $1 AND "authorId" = $2
               RETURNING {}"#,
            POST_COLUMNS
        );

        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(author_id)
            .bind(input.title.as_deref())
            .bind(input.content.as_deref())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("post {} for author {}", id, author_id)))
    }

    /// Every post, in storage order
    pub async fn select_all(&self) -> Result<Vec<Post>, DatabaseError> {
        let sql = format!(r#"SELECT {} FROM "Post""#, POST_COLUMNS);

        Ok(sqlx::query_as::<_, Post>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn select_one(&self, id: i32) -> Result<Option<Post>, DatabaseError> {
        let sql = format!(r#"SELECT {} FROM "Post" WHERE id = $1"#, POST_COLUMNS);

        Ok(sqlx::query_as::<_, Post>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }
}
