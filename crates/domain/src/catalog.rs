//! 目录查询过滤模型
//!
//! 把请求作用域的可选过滤参数表示为带类型的谓词列表（合取），
//! 由基础设施层翻译为具体数据存储的查询形式。过滤器对象按请求
//! 构造，用完即弃，不持久化。

use serde::{Deserialize, Serialize};

use crate::entities::content::ContentStatus;

/// 过滤参数中表示"不限"的哨兵值
pub const FILTER_ALL: &str = "all";

/// 未指定 limit 时的默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// 查询字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Status,
    ContentType,
    Difficulty,
    IsFree,
    Title,
    Excerpt,
    Description,
}

/// 查询谓词
///
/// 所有谓词以逻辑与组合；Or 变体内部以逻辑或组合。
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// 字段等于给定字符串值
    Equals(Field, String),
    /// 字段等于给定布尔值
    EqualsBool(Field, bool),
    /// 字段包含给定子串（不区分大小写）
    Contains(Field, String),
    /// 内容关联到给定 slug 的分类
    HasCategorySlug(String),
    /// 子谓词的逻辑或
    Or(Vec<Predicate>),
}

/// 排序方式
///
/// 未识别或缺失的排序键回退到 Newest。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentSort {
    /// 发布时间降序
    #[default]
    Newest,
    /// 发布时间升序
    Oldest,
    /// 价格升序
    PriceAsc,
    /// 价格降序
    PriceDesc,
    /// 购买数降序
    Popular,
    /// 评分降序
    Rating,
}

impl ContentSort {
    pub fn from_key(key: &str) -> Self {
        match key {
            "newest" => ContentSort::Newest,
            "oldest" => ContentSort::Oldest,
            "price_asc" => ContentSort::PriceAsc,
            "price_desc" => ContentSort::PriceDesc,
            "popular" => ContentSort::Popular,
            "rating" => ContentSort::Rating,
            _ => ContentSort::Newest,
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            ContentSort::Newest => "newest",
            ContentSort::Oldest => "oldest",
            ContentSort::PriceAsc => "price_asc",
            ContentSort::PriceDesc => "price_desc",
            ContentSort::Popular => "popular",
            ContentSort::Rating => "rating",
        }
    }
}

/// 请求作用域的目录过滤参数
///
/// 所有字段都是可选的；字符串字段保留调用方原值，
/// 语义解释集中在 predicates() / sort() / pagination() 中。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentFilter {
    pub content_type: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub difficulty: Option<String>,
    pub price: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl ContentFilter {
    /// 把过滤参数翻译为谓词列表
    ///
    /// 基础谓词 status = published 始终存在；其余谓词相互独立、
    /// 顺序无关，以逻辑与叠加。search 谓词内部是标题/摘要/描述
    /// 三路子串匹配的逻辑或。
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = vec![Predicate::Equals(
            Field::Status,
            ContentStatus::Published.as_str().to_string(),
        )];

        if let Some(content_type) = non_empty(self.content_type.as_deref()) {
            if content_type != FILTER_ALL {
                predicates.push(Predicate::Equals(
                    Field::ContentType,
                    content_type.to_string(),
                ));
            }
        }

        if let Some(category) = non_empty(self.category.as_deref()) {
            predicates.push(Predicate::HasCategorySlug(category.to_string()));
        }

        if let Some(difficulty) = non_empty(self.difficulty.as_deref()) {
            if difficulty != FILTER_ALL {
                predicates.push(Predicate::Equals(
                    Field::Difficulty,
                    difficulty.to_string(),
                ));
            }
        }

        match non_empty(self.price.as_deref()) {
            Some("free") => predicates.push(Predicate::EqualsBool(Field::IsFree, true)),
            Some("paid") => predicates.push(Predicate::EqualsBool(Field::IsFree, false)),
            _ => {}
        }

        if let Some(search) = non_empty(self.search.as_deref()) {
            predicates.push(Predicate::Or(vec![
                Predicate::Contains(Field::Title, search.to_string()),
                Predicate::Contains(Field::Excerpt, search.to_string()),
                Predicate::Contains(Field::Description, search.to_string()),
            ]));
        }

        predicates
    }

    /// 解析排序方式，未识别的键回退到 Newest
    pub fn sort(&self) -> ContentSort {
        self.sort
            .as_deref()
            .map(ContentSort::from_key)
            .unwrap_or_default()
    }

    /// 解析分页参数，page 默认 1，limit 默认 12
    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// 分页参数
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        let offset = (page.saturating_sub(1) as u64) * page_size as u64;
        let limit = page_size as u64;
        Self {
            page,
            page_size,
            offset,
            limit,
        }
    }

    pub fn default_page() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// 分页结果元信息
///
/// 派生值，每次查询重新计算，不存储。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    /// 根据页码、每页条数和总数计算分页元信息
    ///
    /// limit 为 0 时 pages 定义为 0（退化输入，不做除法）。
    pub fn compute(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64) as u32
        };

        Self {
            page,
            limit,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }

    /// 软失败时的复位值：{page:1, limit:12, total:0, pages:0, hasNext:false, hasPrev:false}
    pub fn reset() -> Self {
        Self::compute(1, DEFAULT_PAGE_SIZE, 0)
    }
}
