//! 内容Repository实现
//!
//! 把领域层的谓词列表翻译为参数化 SQL。search 在单个事务内
//! 以同一谓词集读取总数和当前页，构成一次调用内的原子快照。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    Content, ContentRepository, ContentSort, ContentStatistics, ContentStatus, ContentType,
    Difficulty, DomainError, DomainResult, Field, Pagination, Predicate,
};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::query::QueryAs;
use sqlx::{query, query_as, FromRow, Postgres, Row};
use uuid::Uuid;

use crate::db::DbPool;

/// 数据库内容模型
#[derive(Debug, Clone, FromRow)]
struct DbContent {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    pub content_type: String,
    pub difficulty: String,
    pub status: String,
    pub is_free: bool,
    pub price_cents: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub rating: f64,
    pub purchase_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbContent> for Content {
    fn from(db: DbContent) -> Self {
        Content {
            id: db.id,
            slug: db.slug,
            title: db.title,
            excerpt: db.excerpt,
            description: db.description,
            content_type: ContentType::from_str(&db.content_type).unwrap_or(ContentType::Text),
            difficulty: Difficulty::from_str(&db.difficulty).unwrap_or(Difficulty::Beginner),
            status: ContentStatus::from_str(&db.status).unwrap_or(ContentStatus::Draft),
            is_free: db.is_free,
            price_cents: db.price_cents,
            published_at: db.published_at,
            rating: db.rating,
            purchase_count: db.purchase_count,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

const CONTENT_COLUMNS: &str = "c.id, c.slug, c.title, c.excerpt, c.description, c.content_type, \
     c.difficulty, c.status, c.is_free, c.price_cents, c.published_at, c.rating, \
     c.purchase_count, c.created_at, c.updated_at";

/// 动态查询的绑定值
#[derive(Debug, Clone, PartialEq)]
enum SqlValue {
    Text(String),
    Bool(bool),
}

fn column(field: Field) -> &'static str {
    match field {
        Field::Status => "c.status",
        Field::ContentType => "c.content_type",
        Field::Difficulty => "c.difficulty",
        Field::IsFree => "c.is_free",
        Field::Title => "c.title",
        Field::Excerpt => "c.excerpt",
        Field::Description => "c.description",
    }
}

/// 转义 LIKE 模式中的通配符，保证按字面子串匹配
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn render_predicate(predicate: &Predicate, args: &mut Vec<SqlValue>) -> String {
    match predicate {
        Predicate::Equals(field, value) => {
            args.push(SqlValue::Text(value.clone()));
            format!("{} = ${}", column(*field), args.len())
        }
        Predicate::EqualsBool(field, value) => {
            args.push(SqlValue::Bool(*value));
            format!("{} = ${}", column(*field), args.len())
        }
        Predicate::Contains(field, text) => {
            args.push(SqlValue::Text(format!("%{}%", escape_like(text))));
            format!("{} ILIKE ${}", column(*field), args.len())
        }
        Predicate::HasCategorySlug(slug) => {
            args.push(SqlValue::Text(slug.clone()));
            format!(
                "EXISTS (SELECT 1 FROM content_categories cc \
                 JOIN categories cat ON cat.id = cc.category_id \
                 WHERE cc.content_id = c.id AND cat.slug = ${})",
                args.len()
            )
        }
        Predicate::Or(children) => {
            let parts: Vec<String> = children
                .iter()
                .map(|child| render_predicate(child, args))
                .collect();
            format!("({})", parts.join(" OR "))
        }
    }
}

/// 构建 WHERE 子句和绑定值列表
///
/// 谓词列表以 AND 连接；空列表退化为恒真条件。
fn build_where(predicates: &[Predicate]) -> (String, Vec<SqlValue>) {
    if predicates.is_empty() {
        return ("TRUE".to_string(), Vec::new());
    }

    let mut args = Vec::new();
    let conditions: Vec<String> = predicates
        .iter()
        .map(|p| render_predicate(p, &mut args))
        .collect();

    (conditions.join(" AND "), args)
}

/// 排序键到 ORDER BY 的映射
///
/// 每种排序都带 id 升序作为次级排序键，保证结果确定。
fn order_clause(sort: ContentSort) -> &'static str {
    match sort {
        ContentSort::Newest => "c.published_at DESC NULLS LAST, c.id ASC",
        ContentSort::Oldest => "c.published_at ASC NULLS LAST, c.id ASC",
        ContentSort::PriceAsc => "c.price_cents ASC, c.id ASC",
        ContentSort::PriceDesc => "c.price_cents DESC, c.id ASC",
        ContentSort::Popular => "c.purchase_count DESC, c.id ASC",
        ContentSort::Rating => "c.rating DESC, c.id ASC",
    }
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &SqlValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        SqlValue::Text(text) => query.bind(text.clone()),
        SqlValue::Bool(flag) => query.bind(*flag),
    }
}

fn bind_value_as<'q, T>(
    query: QueryAs<'q, Postgres, T, PgArguments>,
    value: &SqlValue,
) -> QueryAs<'q, Postgres, T, PgArguments> {
    match value {
        SqlValue::Text(text) => query.bind(text.clone()),
        SqlValue::Bool(flag) => query.bind(*flag),
    }
}

/// 内容Repository实现
pub struct PgContentRepository {
    pool: Arc<DbPool>,
}

impl PgContentRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn search(
        &self,
        predicates: &[Predicate],
        sort: ContentSort,
        pagination: &Pagination,
    ) -> DomainResult<(Vec<Content>, u64)> {
        let (where_clause, args) = build_where(predicates);

        // 总数和当前页在同一事务内读取，同一谓词集
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?;

        let count_sql = format!("SELECT COUNT(*) FROM content c WHERE {}", where_clause);
        let mut count_query = query(&count_sql);
        for value in &args {
            count_query = bind_value(count_query, value);
        }
        let total: i64 = count_query
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?
            .get(0);

        let data_sql = format!(
            "SELECT {} FROM content c WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
            CONTENT_COLUMNS,
            where_clause,
            order_clause(sort),
            pagination.limit,
            pagination.offset
        );
        let mut data_query = query_as::<_, DbContent>(&data_sql);
        for value in &args {
            data_query = bind_value_as(data_query, value);
        }
        let rows = data_query
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok((rows.into_iter().map(Content::from).collect(), total as u64))
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Content>> {
        let result = query_as::<_, DbContent>(&format!(
            "SELECT {} FROM content c WHERE c.id = $1",
            CONTENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.map(Content::from))
    }

    async fn find_published_by_slug(&self, slug: &str) -> DomainResult<Option<Content>> {
        let result = query_as::<_, DbContent>(&format!(
            "SELECT {} FROM content c WHERE c.slug = $1 AND c.status = 'published'",
            CONTENT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.map(Content::from))
    }

    async fn slug_exists(&self, slug: &str) -> DomainResult<bool> {
        let count: i64 = query("SELECT COUNT(*) FROM content WHERE slug = $1")
            .bind(slug)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?
            .get(0);

        Ok(count > 0)
    }

    async fn create(&self, content: &Content) -> DomainResult<Content> {
        let result = query_as::<_, DbContent>(&format!(
            r#"
            INSERT INTO content AS c
                (id, slug, title, excerpt, description, content_type, difficulty, status,
                 is_free, price_cents, published_at, rating, purchase_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {}
            "#,
            CONTENT_COLUMNS
        ))
        .bind(content.id)
        .bind(&content.slug)
        .bind(&content.title)
        .bind(&content.excerpt)
        .bind(&content.description)
        .bind(content.content_type.as_str())
        .bind(content.difficulty.as_str())
        .bind(content.status.as_str())
        .bind(content.is_free)
        .bind(content.price_cents)
        .bind(content.published_at)
        .bind(content.rating)
        .bind(content.purchase_count)
        .bind(content.created_at)
        .bind(content.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, content: &Content) -> DomainResult<Content> {
        let result = query_as::<_, DbContent>(&format!(
            r#"
            UPDATE content AS c
            SET slug = $2, title = $3, excerpt = $4, description = $5, content_type = $6,
                difficulty = $7, status = $8, is_free = $9, price_cents = $10,
                published_at = $11, rating = $12, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CONTENT_COLUMNS
        ))
        .bind(content.id)
        .bind(&content.slug)
        .bind(&content.title)
        .bind(&content.excerpt)
        .bind(&content.description)
        .bind(content.content_type.as_str())
        .bind(content.difficulty.as_str())
        .bind(content.status.as_str())
        .bind(content.is_free)
        .bind(content.price_cents)
        .bind(content.published_at)
        .bind(content.rating)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = query("DELETE FROM content WHERE id = $1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self, pagination: &Pagination) -> DomainResult<(Vec<Content>, u64)> {
        let total: i64 = query("SELECT COUNT(*) FROM content")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?
            .get(0);

        let rows = query_as::<_, DbContent>(&format!(
            "SELECT {} FROM content c ORDER BY c.created_at DESC, c.id ASC LIMIT {} OFFSET {}",
            CONTENT_COLUMNS, pagination.limit, pagination.offset
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok((rows.into_iter().map(Content::from).collect(), total as u64))
    }

    async fn increment_purchase_count(&self, id: Uuid) -> DomainResult<()> {
        query("UPDATE content SET purchase_count = purchase_count + 1, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(())
    }

    async fn set_categories(&self, content_id: Uuid, category_ids: &[Uuid]) -> DomainResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?;

        query("DELETE FROM content_categories WHERE content_id = $1")
            .bind(content_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?;

        for category_id in category_ids {
            query("INSERT INTO content_categories (content_id, category_id) VALUES ($1, $2)")
                .bind(content_id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::database_error(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(())
    }

    async fn statistics(&self) -> DomainResult<ContentStatistics> {
        let row = query(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE status = 'published') as published,
                COUNT(*) FILTER (WHERE status = 'draft') as draft,
                COUNT(*) FILTER (WHERE status = 'archived') as archived
            FROM content
            "#,
        )
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(ContentStatistics {
            total: row.get::<i64, _>("total") as u64,
            published: row.get::<i64, _>("published") as u64,
            draft: row.get::<i64, _>("draft") as u64,
            archived: row.get::<i64, _>("archived") as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ContentFilter;

    #[test]
    fn test_build_where_base_predicate() {
        let filter = ContentFilter::default();
        let (clause, args) = build_where(&filter.predicates());

        assert_eq!(clause, "c.status = $1");
        assert_eq!(args, vec![SqlValue::Text("published".to_string())]);
    }

    #[test]
    fn test_build_where_empty_is_true() {
        let (clause, args) = build_where(&[]);
        assert_eq!(clause, "TRUE");
        assert!(args.is_empty());
    }

    #[test]
    fn test_build_where_full_filter() {
        let filter = ContentFilter {
            content_type: Some("video".to_string()),
            category: Some("fitness".to_string()),
            difficulty: Some("beginner".to_string()),
            price: Some("free".to_string()),
            search: Some("yoga".to_string()),
            ..Default::default()
        };
        let (clause, args) = build_where(&filter.predicates());

        // 谓词按构造顺序编号，占位符与绑定值一一对应
        assert_eq!(args.len(), 8);
        assert!(clause.starts_with("c.status = $1"));
        assert!(clause.contains("c.content_type = $2"));
        assert!(clause.contains("cat.slug = $3"));
        assert!(clause.contains("c.difficulty = $4"));
        assert!(clause.contains("c.is_free = $5"));
        assert!(clause.contains(
            "(c.title ILIKE $6 OR c.excerpt ILIKE $7 OR c.description ILIKE $8)"
        ));

        assert_eq!(args[4], SqlValue::Bool(true));
        assert_eq!(args[5], SqlValue::Text("%yoga%".to_string()));
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let filter = ContentFilter {
            search: Some("100%_done".to_string()),
            ..Default::default()
        };
        let (_, args) = build_where(&filter.predicates());

        assert_eq!(args[1], SqlValue::Text("%100\\%\\_done%".to_string()));
    }

    #[test]
    fn test_category_predicate_uses_exists_subquery() {
        let (clause, args) = build_where(&[Predicate::HasCategorySlug("cooking".to_string())]);

        assert!(clause.contains("EXISTS (SELECT 1 FROM content_categories cc"));
        assert!(clause.contains("cat.slug = $1"));
        assert_eq!(args, vec![SqlValue::Text("cooking".to_string())]);
    }

    #[test]
    fn test_order_clause_has_deterministic_tie_break() {
        for sort in [
            ContentSort::Newest,
            ContentSort::Oldest,
            ContentSort::PriceAsc,
            ContentSort::PriceDesc,
            ContentSort::Popular,
            ContentSort::Rating,
        ] {
            assert!(order_clause(sort).ends_with("c.id ASC"));
        }

        assert_eq!(
            order_clause(ContentSort::Popular),
            "c.purchase_count DESC, c.id ASC"
        );
        assert_eq!(
            order_clause(ContentSort::Newest),
            "c.published_at DESC NULLS LAST, c.id ASC"
        );
    }

    #[test]
    fn test_escape_like_literal_backslash() {
        assert_eq!(escape_like(r"a\b"), r"a\\b");
        assert_eq!(escape_like("50%"), r"50\%");
        assert_eq!(escape_like("under_score"), r"under\_score");
    }
}
