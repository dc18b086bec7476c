//! 用例服务

pub mod catalog_service;
pub mod content_admin_service;
pub mod progress_service;
pub mod purchase_service;
pub mod user_service;

pub use catalog_service::{CatalogService, CatalogServiceDependencies, QUERY_FAILURE_MESSAGE};
pub use content_admin_service::{
    ContentAdminService, ContentAdminServiceDependencies, CreateContentRequest,
    UpdateContentRequest,
};
pub use progress_service::{ProgressService, ProgressServiceDependencies, RecordProgressRequest};
pub use purchase_service::{PurchaseService, PurchaseServiceDependencies};
pub use user_service::{
    AuthenticateUserRequest, RegisterUserRequest, UserService, UserServiceDependencies,
};

#[cfg(test)]
pub mod test_support;
