use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::blogs::dto::BlogResponse;
use crate::blogs::repo;
use crate::error::{ApiError, FieldError};

/// Parse an opaque identifier, failing before any store access.
pub(crate) fn parse_id(value: &str, entity: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| {
        warn!(entity, value, "malformed id");
        ApiError::InvalidId(entity)
    })
}

/// Schema constraints for a blog post, checked before construction.
pub(crate) fn validate_blog(title: &str, content: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    }
    if content.trim().is_empty() {
        errors.push(FieldError::new("content", "Content is required"));
    }
    errors
}

/// Ownership gate: only the original author may mutate a post, admin role
/// alone is insufficient. Shared by the update and delete paths.
pub(crate) fn ensure_author(
    blog: &BlogResponse,
    user_id: Uuid,
    action: &str,
) -> Result<(), ApiError> {
    if blog.author.id != user_id {
        warn!(blog_id = %blog.id, user_id = %user_id, action, "ownership check failed");
        return Err(ApiError::Forbidden(format!(
            "Not authorized to {action} this blog"
        )));
    }
    Ok(())
}

pub async fn list_all(db: &PgPool) -> Result<Vec<BlogResponse>, ApiError> {
    let records = repo::list_all(db).await?;
    Ok(records.into_iter().map(Into::into).collect())
}

/// `Ok(None)` means a well-formed id with no matching record; a malformed
/// id never reaches the store.
pub async fn get_by_id(db: &PgPool, id: &str) -> Result<Option<BlogResponse>, ApiError> {
    let id = parse_id(id, "blog")?;
    let record = repo::find_by_id(db, id).await?;
    Ok(record.map(Into::into))
}

pub async fn list_by_author(db: &PgPool, author_id: &str) -> Result<Vec<BlogResponse>, ApiError> {
    let author_id = parse_id(author_id, "author")?;
    let records = repo::list_by_author(db, author_id).await?;
    Ok(records.into_iter().map(Into::into).collect())
}

pub async fn create(
    db: &PgPool,
    title: &str,
    content: &str,
    author_id: &str,
) -> Result<BlogResponse, ApiError> {
    let author_id = parse_id(author_id, "author")?;
    let errors = validate_blog(title, content);
    if !errors.is_empty() {
        warn!(?errors, "blog validation failed");
        return Err(ApiError::Validation(errors));
    }
    let record = repo::insert(db, title, content, author_id).await?;
    Ok(record.into())
}

pub async fn update(
    db: &PgPool,
    id: &str,
    title: &str,
    content: &str,
) -> Result<Option<BlogResponse>, ApiError> {
    let id = parse_id(id, "blog")?;
    let errors = validate_blog(title, content);
    if !errors.is_empty() {
        warn!(?errors, "blog validation failed");
        return Err(ApiError::Validation(errors));
    }
    let record = repo::update(db, id, title, content).await?;
    Ok(record.map(Into::into))
}

pub async fn delete(db: &PgPool, id: &str) -> Result<Option<BlogResponse>, ApiError> {
    let id = parse_id(id, "blog")?;
    let record = repo::delete(db, id).await?;
    Ok(record.map(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blogs::dto::BlogAuthor;
    use time::OffsetDateTime;

    fn blog_by(author_id: Uuid) -> BlogResponse {
        BlogResponse {
            id: Uuid::new_v4(),
            title: "T".into(),
            content: "C".into(),
            author: BlogAuthor {
                id: author_id,
                name: "Ada".into(),
            },
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn parse_id_accepts_well_formed_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "blog").unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_malformed_values() {
        for bad in ["", "123", "not-a-uuid", "z0a1b2c3-0000-0000-0000-000000000000"] {
            match parse_id(bad, "blog") {
                Err(ApiError::InvalidId("blog")) => {}
                other => panic!("expected InvalidId, got {other:?}"),
            }
        }
    }

    #[test]
    fn validate_blog_flags_empty_fields() {
        let errors = validate_blog("", "  ");
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["title", "content"]);
    }

    #[test]
    fn validate_blog_passes_non_empty_fields() {
        assert!(validate_blog("T", "C").is_empty());
    }

    #[test]
    fn owner_may_mutate() {
        let author = Uuid::new_v4();
        assert!(ensure_author(&blog_by(author), author, "update").is_ok());
    }

    #[test]
    fn other_admin_is_forbidden_with_action_in_message() {
        let blog = blog_by(Uuid::new_v4());
        let other_admin = Uuid::new_v4();
        match ensure_author(&blog, other_admin, "delete") {
            Err(ApiError::Forbidden(msg)) => {
                assert_eq!(msg, "Not authorized to delete this blog");
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
        match ensure_author(&blog, other_admin, "update") {
            Err(ApiError::Forbidden(msg)) => {
                assert_eq!(msg, "Not authorized to update this blog");
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }
}
