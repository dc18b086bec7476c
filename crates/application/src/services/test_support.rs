//! 测试用内存仓储
//!
//! 在内存中对谓词列表求值，让用例测试无需数据库即可覆盖
//! 过滤、排序、分页的完整语义。

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use domain::{
    Category, CategoryRepository, Content, ContentRepository, ContentSort, ContentStatistics,
    ContentStatus, ContentType, Difficulty, DomainError, DomainResult, Field, Pagination,
    PlaybackProgress, Predicate, ProgressRepository, Purchase, PurchaseRepository,
    PurchaseStatistics, PurchaseStatus, User, UserRepository, UserStatistics,
};

use crate::clock::Clock;
use crate::password::{PasswordHasher, PasswordHasherError};

/// 固定时钟
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn default_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self(Self::default_time())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 明文拼接的假哈希器，避免测试付出 bcrypt 成本
#[derive(Default)]
pub struct FakePasswordHasher;

#[async_trait]
impl PasswordHasher for FakePasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("hashed:{plaintext}"))
    }

    async fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, PasswordHasherError> {
        Ok(hashed == format!("hashed:{plaintext}"))
    }
}

/// 测试内容构造器
pub struct ContentBuilder {
    content: Content,
    categories: Vec<String>,
}

impl ContentBuilder {
    pub fn published(slug: &str, title: &str) -> Self {
        let now = FixedClock::default_time();
        let mut content = Content::new_draft(
            slug,
            title,
            ContentType::Video,
            Difficulty::Beginner,
            4900,
            now,
        )
        .unwrap();
        content.publish(now).unwrap();
        Self {
            content,
            categories: Vec::new(),
        }
    }

    pub fn draft(slug: &str, title: &str) -> Self {
        let now = FixedClock::default_time();
        let content = Content::new_draft(
            slug,
            title,
            ContentType::Video,
            Difficulty::Beginner,
            4900,
            now,
        )
        .unwrap();
        Self {
            content,
            categories: Vec::new(),
        }
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content.content_type = content_type;
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.content.difficulty = difficulty;
        self
    }

    pub fn free(mut self) -> Self {
        self.content.is_free = true;
        self.content.price_cents = 0;
        self
    }

    pub fn price(mut self, cents: i64) -> Self {
        self.content.price_cents = cents;
        self.content.is_free = cents == 0;
        self
    }

    pub fn excerpt(mut self, excerpt: &str) -> Self {
        self.content.excerpt = Some(excerpt.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.content.description = Some(description.to_string());
        self
    }

    pub fn published_days_ago(mut self, days: i64) -> Self {
        self.content.published_at = Some(FixedClock::default_time() - Duration::days(days));
        self
    }

    pub fn purchases(mut self, count: i64) -> Self {
        self.content.purchase_count = count;
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.content.rating = rating;
        self
    }

    pub fn category(mut self, slug: &str) -> Self {
        self.categories.push(slug.to_string());
        self
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.content.id = id;
        self
    }

    pub fn build(self) -> (Content, Vec<String>) {
        (self.content, self.categories)
    }
}

/// 内存内容仓储
#[derive(Default)]
pub struct InMemoryContentRepository {
    items: Mutex<Vec<Content>>,
    category_slugs: Mutex<HashMap<Uuid, Vec<String>>>,
    fail_next: AtomicBool,
}

impl InMemoryContentRepository {
    pub fn with_items(builders: Vec<ContentBuilder>) -> Self {
        let repo = Self::default();
        {
            let mut items = repo.items.lock().unwrap();
            let mut slugs = repo.category_slugs.lock().unwrap();
            for builder in builders {
                let (content, categories) = builder.build();
                slugs.insert(content.id, categories);
                items.push(content);
            }
        }
        repo
    }

    /// 让下一次查询失败，用于软失败路径测试
    pub fn fail_next_query(&self) {
        self.fail_next.store(true, AtomicOrdering::SeqCst);
    }

    fn text_field(content: &Content, field: Field) -> Option<String> {
        match field {
            Field::Status => Some(content.status.as_str().to_string()),
            Field::ContentType => Some(content.content_type.as_str().to_string()),
            Field::Difficulty => Some(content.difficulty.as_str().to_string()),
            Field::Title => Some(content.title.clone()),
            Field::Excerpt => content.excerpt.clone(),
            Field::Description => content.description.clone(),
            Field::IsFree => None,
        }
    }

    fn matches(
        content: &Content,
        predicate: &Predicate,
        categories: &HashMap<Uuid, Vec<String>>,
    ) -> bool {
        match predicate {
            Predicate::Equals(field, value) => {
                Self::text_field(content, *field).as_deref() == Some(value.as_str())
            }
            Predicate::EqualsBool(Field::IsFree, value) => content.is_free == *value,
            Predicate::EqualsBool(_, _) => false,
            Predicate::Contains(field, needle) => Self::text_field(content, *field)
                .map(|text| text.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Predicate::HasCategorySlug(slug) => categories
                .get(&content.id)
                .map(|slugs| slugs.iter().any(|s| s == slug))
                .unwrap_or(false),
            Predicate::Or(children) => children
                .iter()
                .any(|child| Self::matches(content, child, categories)),
        }
    }

    fn compare(a: &Content, b: &Content, sort: ContentSort) -> Ordering {
        let primary = match sort {
            ContentSort::Newest => b.published_at.cmp(&a.published_at),
            ContentSort::Oldest => a.published_at.cmp(&b.published_at),
            ContentSort::PriceAsc => a.price_cents.cmp(&b.price_cents),
            ContentSort::PriceDesc => b.price_cents.cmp(&a.price_cents),
            ContentSort::Popular => b.purchase_count.cmp(&a.purchase_count),
            ContentSort::Rating => b
                .rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal),
        };
        // 次级排序键：id 升序，保证确定性
        primary.then_with(|| a.id.cmp(&b.id))
    }

    fn take_failure(&self) -> DomainResult<()> {
        if self.fail_next.swap(false, AtomicOrdering::SeqCst) {
            Err(DomainError::database_error("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn search(
        &self,
        predicates: &[Predicate],
        sort: ContentSort,
        pagination: &Pagination,
    ) -> DomainResult<(Vec<Content>, u64)> {
        self.take_failure()?;

        let items = self.items.lock().unwrap();
        let categories = self.category_slugs.lock().unwrap();

        let mut matched: Vec<Content> = items
            .iter()
            .filter(|content| {
                predicates
                    .iter()
                    .all(|p| Self::matches(content, p, &categories))
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| Self::compare(a, b, sort));

        let total = matched.len() as u64;
        let page: Vec<Content> = matched
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Content>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_published_by_slug(&self, slug: &str) -> DomainResult<Option<Content>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug && c.status == ContentStatus::Published)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> DomainResult<bool> {
        Ok(self.items.lock().unwrap().iter().any(|c| c.slug == slug))
    }

    async fn create(&self, content: &Content) -> DomainResult<Content> {
        self.items.lock().unwrap().push(content.clone());
        Ok(content.clone())
    }

    async fn update(&self, content: &Content) -> DomainResult<Content> {
        let mut items = self.items.lock().unwrap();
        let slot = items
            .iter_mut()
            .find(|c| c.id == content.id)
            .ok_or_else(|| {
                DomainError::resource_not_found("content", content.id.to_string())
            })?;
        *slot = content.clone();
        Ok(content.clone())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|c| c.id != id);
        Ok(items.len() < before)
    }

    async fn list_all(&self, pagination: &Pagination) -> DomainResult<(Vec<Content>, u64)> {
        let items = self.items.lock().unwrap();
        let total = items.len() as u64;
        let page: Vec<Content> = items
            .iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn increment_purchase_count(&self, id: Uuid) -> DomainResult<()> {
        let mut items = self.items.lock().unwrap();
        if let Some(content) = items.iter_mut().find(|c| c.id == id) {
            content.purchase_count += 1;
        }
        Ok(())
    }

    async fn set_categories(&self, content_id: Uuid, category_ids: &[Uuid]) -> DomainResult<()> {
        // 测试仓储按 id 字符串记录，足以验证关联被建立
        self.category_slugs.lock().unwrap().insert(
            content_id,
            category_ids.iter().map(|id| id.to_string()).collect(),
        );
        Ok(())
    }

    async fn statistics(&self) -> DomainResult<ContentStatistics> {
        let items = self.items.lock().unwrap();
        Ok(ContentStatistics {
            total: items.len() as u64,
            published: items
                .iter()
                .filter(|c| c.status == ContentStatus::Published)
                .count() as u64,
            draft: items
                .iter()
                .filter(|c| c.status == ContentStatus::Draft)
                .count() as u64,
            archived: items
                .iter()
                .filter(|c| c.status == ContentStatus::Archived)
                .count() as u64,
        })
    }
}

/// 内存用户仓储
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> DomainResult<User> {
        self.users.lock().unwrap().push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update(&self, user: &User) -> DomainResult<User> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| DomainError::resource_not_found("user", user.id.to_string()))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn username_exists(&self, username: &str) -> DomainResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> DomainResult<bool> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
    }

    async fn statistics(&self) -> DomainResult<UserStatistics> {
        let users = self.users.lock().unwrap();
        Ok(UserStatistics {
            total_users: users.len() as u64,
            active_users: users.iter().filter(|u| u.is_active()).count() as u64,
            admin_users: users
                .iter()
                .filter(|u| u.role == domain::Role::Admin)
                .count() as u64,
        })
    }
}

/// 内存购买仓储
#[derive(Default)]
pub struct InMemoryPurchaseRepository {
    purchases: Mutex<Vec<Purchase>>,
}

#[async_trait]
impl PurchaseRepository for InMemoryPurchaseRepository {
    async fn create(&self, purchase: &Purchase) -> DomainResult<Purchase> {
        self.purchases.lock().unwrap().push(purchase.clone());
        Ok(purchase.clone())
    }

    async fn find_completed(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> DomainResult<Option<Purchase>> {
        Ok(self
            .purchases
            .lock()
            .unwrap()
            .iter()
            .find(|p| {
                p.user_id == user_id
                    && p.content_id == content_id
                    && p.status == PurchaseStatus::Completed
            })
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> DomainResult<(Vec<Purchase>, u64)> {
        let purchases = self.purchases.lock().unwrap();
        let matched: Vec<Purchase> = purchases
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn statistics(&self) -> DomainResult<PurchaseStatistics> {
        let purchases = self.purchases.lock().unwrap();
        let completed: Vec<&Purchase> = purchases
            .iter()
            .filter(|p| p.status == PurchaseStatus::Completed)
            .collect();
        Ok(PurchaseStatistics {
            total_purchases: completed.len() as u64,
            revenue_cents: completed.iter().map(|p| p.amount_cents).sum(),
        })
    }
}

/// 内存进度仓储
#[derive(Default)]
pub struct InMemoryProgressRepository {
    entries: Mutex<Vec<PlaybackProgress>>,
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn upsert(&self, progress: &PlaybackProgress) -> DomainResult<PlaybackProgress> {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|p| !(p.user_id == progress.user_id && p.content_id == progress.content_id));
        entries.push(progress.clone());
        Ok(progress.clone())
    }

    async fn find(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> DomainResult<Option<PlaybackProgress>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id && p.content_id == content_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> DomainResult<Vec<PlaybackProgress>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// 内存分类仓储
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    categories: Mutex<Vec<Category>>,
}

impl InMemoryCategoryRepository {
    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            categories: Mutex::new(categories),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, category: &Category) -> DomainResult<Category> {
        self.categories.lock().unwrap().push(category.clone());
        Ok(category.clone())
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list_all(&self) -> DomainResult<Vec<Category>> {
        Ok(self.categories.lock().unwrap().clone())
    }
}
