//! 主应用程序入口
//!
//! 启动 Axum Web API 服务。

use std::sync::Arc;

use application::services::{
    CatalogService, CatalogServiceDependencies, ContentAdminService,
    ContentAdminServiceDependencies, ProgressService, ProgressServiceDependencies,
    PurchaseService, PurchaseServiceDependencies, UserService, UserServiceDependencies,
};
use application::SystemClock;
use config::AppConfig;
use infrastructure::{
    create_pg_pool, BcryptPasswordHasher, PgCategoryRepository, PgContentRepository,
    PgProgressRepository, PgPurchaseRepository, PgUserRepository,
};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 加载配置：默认值 -> 可选文件 -> 环境变量
    let config = AppConfig::load()?;
    tracing::info!("配置加载完成: {}", config.sanitize());

    tracing::info!(
        "连接数据库: {}",
        config.database.url.split('@').next_back().unwrap_or("unknown")
    );
    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    let pool = Arc::new(pg_pool);

    // 创建 repository 实例
    let content_repository = Arc::new(PgContentRepository::new(pool.clone()));
    let category_repository = Arc::new(PgCategoryRepository::new(pool.clone()));
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let purchase_repository = Arc::new(PgPurchaseRepository::new(pool.clone()));
    let progress_repository = Arc::new(PgProgressRepository::new(pool));

    // 创建基础服务
    let password_hasher: Arc<dyn application::PasswordHasher> =
        Arc::new(BcryptPasswordHasher::new(config.server.bcrypt_cost));
    let clock: Arc<dyn application::Clock> = Arc::new(SystemClock);

    // 创建应用层服务
    let catalog_service = CatalogService::new(CatalogServiceDependencies {
        content_repository: content_repository.clone(),
        category_repository: category_repository.clone(),
    });

    let user_service = UserService::new(UserServiceDependencies {
        user_repository: user_repository.clone(),
        password_hasher,
        clock: clock.clone(),
    });

    let purchase_service = PurchaseService::new(PurchaseServiceDependencies {
        purchase_repository: purchase_repository.clone(),
        content_repository: content_repository.clone(),
        clock: clock.clone(),
    });

    let progress_service = ProgressService::new(ProgressServiceDependencies {
        progress_repository,
        content_repository: content_repository.clone(),
        purchase_repository: purchase_repository.clone(),
        clock: clock.clone(),
    });

    let content_admin_service = ContentAdminService::new(ContentAdminServiceDependencies {
        content_repository,
        category_repository,
        user_repository,
        purchase_repository,
        clock,
    });

    // 创建 JWT 服务
    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

    // 创建应用状态
    let state = AppState::new(
        Arc::new(catalog_service),
        Arc::new(user_service),
        Arc::new(purchase_service),
        Arc::new(progress_service),
        Arc::new(content_admin_service),
        jwt_service,
        config.catalog.clone(),
    );

    // 启动 Web 服务器
    let app = router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("内容平台服务器启动在 http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
