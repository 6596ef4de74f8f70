use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Blog row with the author's name joined in. Every read populates the
/// author; the `users` row is guaranteed by the foreign key.
#[derive(Debug, Clone, FromRow)]
pub struct BlogRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const SELECT_COLUMNS: &str = r#"
    b.id, b.title, b.content, b.author_id, u.name AS author_name,
    b.created_at, b.updated_at
"#;

pub async fn list_all(db: &PgPool) -> Result<Vec<BlogRecord>, sqlx::Error> {
    sqlx::query_as::<_, BlogRecord>(&format!(
        r#"
        SELECT {SELECT_COLUMNS}
        FROM blogs b
        JOIN users u ON u.id = b.author_id
        ORDER BY b.created_at DESC
        "#
    ))
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<BlogRecord>, sqlx::Error> {
    sqlx::query_as::<_, BlogRecord>(&format!(
        r#"
        SELECT {SELECT_COLUMNS}
        FROM blogs b
        JOIN users u ON u.id = b.author_id
        WHERE b.id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn list_by_author(
    db: &PgPool,
    author_id: Uuid,
) -> Result<Vec<BlogRecord>, sqlx::Error> {
    sqlx::query_as::<_, BlogRecord>(&format!(
        r#"
        SELECT {SELECT_COLUMNS}
        FROM blogs b
        JOIN users u ON u.id = b.author_id
        WHERE b.author_id = $1
        ORDER BY b.created_at DESC
        "#
    ))
    .bind(author_id)
    .fetch_all(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    title: &str,
    content: &str,
    author_id: Uuid,
) -> Result<BlogRecord, sqlx::Error> {
    sqlx::query_as::<_, BlogRecord>(
        r#"
        WITH inserted AS (
            INSERT INTO blogs (title, content, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, author_id, created_at, updated_at
        )
        SELECT i.id, i.title, i.content, i.author_id, u.name AS author_name,
               i.created_at, i.updated_at
        FROM inserted i
        JOIN users u ON u.id = i.author_id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(author_id)
    .fetch_one(db)
    .await
}

/// Returns `None` when no row matches, which also covers the window where
/// a concurrent delete lands between an ownership check and this update.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    title: &str,
    content: &str,
) -> Result<Option<BlogRecord>, sqlx::Error> {
    sqlx::query_as::<_, BlogRecord>(
        r#"
        WITH updated AS (
            UPDATE blogs
            SET title = $2, content = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, title, content, author_id, created_at, updated_at
        )
        SELECT up.id, up.title, up.content, up.author_id, u.name AS author_name,
               up.created_at, up.updated_at
        FROM updated up
        JOIN users u ON u.id = up.author_id
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<Option<BlogRecord>, sqlx::Error> {
    sqlx::query_as::<_, BlogRecord>(
        r#"
        WITH deleted AS (
            DELETE FROM blogs
            WHERE id = $1
            RETURNING id, title, content, author_id, created_at, updated_at
        )
        SELECT d.id, d.title, d.content, d.author_id, u.name AS author_name,
               d.created_at, d.updated_at
        FROM deleted d
        JOIN users u ON u.id = d.author_id
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}
