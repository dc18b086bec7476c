//! Repository接口定义
//!
//! 定义数据访问层的抽象接口，遵循清洁架构原则，内层定义接口，外层实现接口。

pub mod category_repository;
pub mod content_repository;
pub mod progress_repository;
pub mod purchase_repository;
pub mod user_repository;

pub use category_repository::CategoryRepository;
pub use content_repository::{ContentRepository, ContentStatistics};
pub use progress_repository::ProgressRepository;
pub use purchase_repository::{PurchaseRepository, PurchaseStatistics};
pub use user_repository::{UserRepository, UserStatistics};
