use std::sync::Arc;

use application::services::{
    CatalogService, ContentAdminService, ProgressService, PurchaseService, UserService,
};
use config::CatalogConfig;

use crate::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<CatalogService>,
    pub user_service: Arc<UserService>,
    pub purchase_service: Arc<PurchaseService>,
    pub progress_service: Arc<ProgressService>,
    pub content_admin_service: Arc<ContentAdminService>,
    pub jwt_service: Arc<JwtService>,
    pub catalog_config: CatalogConfig,
}

impl AppState {
    pub fn new(
        catalog_service: Arc<CatalogService>,
        user_service: Arc<UserService>,
        purchase_service: Arc<PurchaseService>,
        progress_service: Arc<ProgressService>,
        content_admin_service: Arc<ContentAdminService>,
        jwt_service: Arc<JwtService>,
        catalog_config: CatalogConfig,
    ) -> Self {
        Self {
            catalog_service,
            user_service,
            purchase_service,
            progress_service,
            content_admin_service,
            jwt_service,
            catalog_config,
        }
    }
}
