use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::blogs::repo::BlogRecord;

/// Request body for creating or updating a blog post.
#[derive(Debug, Deserialize)]
pub struct BlogInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Author display fields resolved from the stored reference.
#[derive(Debug, Serialize)]
pub struct BlogAuthor {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: BlogAuthor,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<BlogRecord> for BlogResponse {
    fn from(record: BlogRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
            author: BlogAuthor {
                id: record.author_id,
                name: record.author_name,
            },
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedBlogResponse {
    pub message: &'static str,
    #[serde(rename = "deletedBlogId")]
    pub deleted_blog_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_nests_populated_author() {
        let record = BlogRecord {
            id: Uuid::new_v4(),
            title: "T".into(),
            content: "C".into(),
            author_id: Uuid::new_v4(),
            author_name: "Ada".into(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let author_id = record.author_id;
        let response = BlogResponse::from(record);
        assert_eq!(response.author.id, author_id);
        assert_eq!(response.author.name, "Ada");

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["author"]["name"], "Ada");
        assert_eq!(value["title"], "T");
    }

    #[test]
    fn deleted_response_uses_wire_field_name() {
        let response = DeletedBlogResponse {
            message: "Blog post removed",
            deleted_blog_id: Uuid::nil(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("deletedBlogId").is_some());
    }
}
