//! PostgreSQL Repository实现

pub mod category_repository_impl;
pub mod content_repository_impl;
pub mod progress_repository_impl;
pub mod purchase_repository_impl;
pub mod user_repository_impl;

pub use category_repository_impl::PgCategoryRepository;
pub use content_repository_impl::PgContentRepository;
pub use progress_repository_impl::PgProgressRepository;
pub use purchase_repository_impl::PgPurchaseRepository;
pub use user_repository_impl::PgUserRepository;
