use serde_json::{Map, Value};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, SqlitePool};
use uuid::Uuid;

use super::{validate_sort_field, Document, DocumentStore, SortDirection, StoreError};

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    body: String,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document, StoreError> {
        let fields: Map<String, Value> = serde_json::from_str(&self.body)?;
        Ok(Document {
            id: self.id,
            fields,
        })
    }
}

/// Document store kept in a single SQLite table of JSON bodies.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

impl DocumentStore for SqliteDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        fields: &Map<String, Value>,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let body = serde_json::to_string(fields)?;
        sqlx::query("INSERT INTO documents (id, collection, body) VALUES (?1, ?2, ?3)")
            .bind(&id)
            .bind(collection)
            .bind(body)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let body = serde_json::to_string(fields)?;
        let affected = sqlx::query(
            r#"
            UPDATE documents
            SET body = ?1,
                updated_at = CURRENT_TIMESTAMP
            WHERE collection = ?2 AND id = ?3
            "#,
        )
        .bind(body)
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let affected = sqlx::query("DELETE FROM documents WHERE collection = ?1 AND id = ?2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_ordered(
        &self,
        collection: &str,
        sort_field: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        validate_sort_field(sort_field)?;
        // Ties always fall back to insertion order, whatever the direction.
        let sql = match direction {
            SortDirection::Ascending => {
                r#"
                SELECT id, body
                FROM documents
                WHERE collection = ?1
                ORDER BY json_extract(body, ?2) ASC, seq ASC
                "#
            }
            SortDirection::Descending => {
                r#"
                SELECT id, body
                FROM documents
                WHERE collection = ?1
                ORDER BY json_extract(body, ?2) DESC, seq ASC
                "#
            }
        };
        let rows = sqlx::query_as::<_, DocumentRow>(sql)
            .bind(collection)
            .bind(format!("$.{sort_field}"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(DocumentRow::into_document).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fields must be an object"),
        }
    }

    async fn memory_store() -> SqliteDocumentStore {
        SqliteDocumentStore::connect("sqlite::memory:")
            .await
            .expect("connect must succeed")
    }

    #[tokio::test]
    async fn migration_creates_documents_table() {
        let store = memory_store().await;
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'documents'",
        )
        .fetch_one(&store.pool)
        .await
        .expect("query must succeed");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = memory_store().await;
        let first = store
            .insert("websites", &fields(json!({"title": "A", "order": 0})))
            .await
            .expect("first insert must succeed");
        let second = store
            .insert("websites", &fields(json!({"title": "B", "order": 0})))
            .await
            .expect("second insert must succeed");
        assert_ne!(first, second);
        assert!(!first.is_empty());
    }

    #[tokio::test]
    async fn list_ordered_sorts_numerically_and_keeps_insertion_order_on_ties() {
        let store = memory_store().await;
        for (title, order) in [("ten", 10), ("two", 2), ("tie-a", 5), ("tie-b", 5)] {
            store
                .insert("websites", &fields(json!({"title": title, "order": order})))
                .await
                .expect("insert must succeed");
        }

        let ascending = store
            .list_ordered("websites", "order", SortDirection::Ascending)
            .await
            .expect("list must succeed");
        let titles: Vec<&str> = ascending
            .iter()
            .map(|doc| doc.fields["title"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(titles, vec!["two", "tie-a", "tie-b", "ten"]);

        let descending = store
            .list_ordered("websites", "order", SortDirection::Descending)
            .await
            .expect("list must succeed");
        let titles: Vec<&str> = descending
            .iter()
            .map(|doc| doc.fields["title"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(titles, vec!["ten", "tie-a", "tie-b", "two"]);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = memory_store().await;
        store
            .insert("websites", &fields(json!({"title": "site"})))
            .await
            .expect("insert must succeed");
        store
            .insert("drafts", &fields(json!({"title": "draft"})))
            .await
            .expect("insert must succeed");

        let websites = store
            .list_ordered("websites", "order", SortDirection::Ascending)
            .await
            .expect("list must succeed");
        assert_eq!(websites.len(), 1);
        assert_eq!(websites[0].fields["title"], json!("site"));
    }

    #[tokio::test]
    async fn update_replaces_whole_body() {
        let store = memory_store().await;
        let id = store
            .insert("websites", &fields(json!({"title": "old", "icon": "x.png"})))
            .await
            .expect("insert must succeed");
        store
            .update("websites", &id, &fields(json!({"title": "new"})))
            .await
            .expect("update must succeed");

        let rows = store
            .list_ordered("websites", "order", SortDirection::Ascending)
            .await
            .expect("list must succeed");
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].fields, fields(json!({"title": "new"})));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_documents() {
        let store = memory_store().await;
        let updated = store
            .update("websites", "missing", &fields(json!({"title": "x"})))
            .await;
        let deleted = store.delete("websites", "missing").await;
        assert!(matches!(updated, Err(StoreError::NotFound)));
        assert!(matches!(deleted, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn file_backed_store_survives_reconnect() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("portal.db").to_string_lossy()
        );
        let id = {
            let store = SqliteDocumentStore::connect(&url)
                .await
                .expect("connect must succeed");
            store
                .insert("websites", &fields(json!({"title": "kept"})))
                .await
                .expect("insert must succeed")
        };

        let reopened = SqliteDocumentStore::connect(&url)
            .await
            .expect("reconnect must succeed");
        let rows = reopened
            .list_ordered("websites", "order", SortDirection::Ascending)
            .await
            .expect("list must succeed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
    }
}
