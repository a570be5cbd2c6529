//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use wms_auth::jwt::{JwtDecoder, JwtEncoder};
use wms_auth::password::{PasswordHasher, PasswordValidator};
use wms_auth::rbac::RbacEnforcer;
use wms_core::config::AppConfig;
use wms_core::error::AppError;
use wms_database::repositories::{
    ContractRepository, NotificationRepository, ProductRepository, SerialRepository,
    StatisticsRepository, TicketRepository, UserRepository, WarrantyHistoryRepository,
};
use wms_service::email::{EmailTemplates, build_mailer};
use wms_service::{
    AdminUserService, ContractService, DashboardService, ExpirySweep, NotificationService,
    PortalService, ProductService, SerialService, TicketService, UserService,
    WarrantyHistoryService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub user_service: Arc<UserService>,
    pub admin_user_service: Arc<AdminUserService>,
    pub product_service: Arc<ProductService>,
    pub contract_service: Arc<ContractService>,
    pub serial_service: Arc<SerialService>,
    pub ticket_service: Arc<TicketService>,
    pub warranty_history_service: Arc<WarrantyHistoryService>,
    pub notification_service: Arc<NotificationService>,
    pub dashboard_service: Arc<DashboardService>,
    pub portal_service: Arc<PortalService>,
    /// Expiry sweep shared with the scheduler
    pub expiry_sweep: Arc<ExpirySweep>,
}

impl AppState {
    /// Wire repositories, auth components and services over `db_pool`.
    pub fn build(config: AppConfig, db_pool: PgPool) -> Result<Self, AppError> {
        // ── Repositories ─────────────────────────────────────
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let product_repo = Arc::new(ProductRepository::new(db_pool.clone()));
        let contract_repo = Arc::new(ContractRepository::new(db_pool.clone()));
        let serial_repo = Arc::new(SerialRepository::new(db_pool.clone()));
        let ticket_repo = Arc::new(TicketRepository::new(db_pool.clone()));
        let history_repo = Arc::new(WarrantyHistoryRepository::new(db_pool.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
        let stats_repo = Arc::new(StatisticsRepository::new(db_pool.clone()));

        // ── Auth ─────────────────────────────────────────────
        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let rbac = Arc::new(RbacEnforcer::new());

        // ── Email ────────────────────────────────────────────
        let mailer = build_mailer(&config.email)?;
        let templates = Arc::new(EmailTemplates::new(&config.email));

        // ── Services ─────────────────────────────────────────
        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&password_validator),
            jwt_encoder,
        ));
        let admin_user_service = Arc::new(AdminUserService::new(
            Arc::clone(&user_repo),
            password_hasher,
            password_validator,
            Arc::clone(&rbac),
        ));
        let product_service = Arc::new(ProductService::new(
            Arc::clone(&product_repo),
            Arc::clone(&serial_repo),
            Arc::clone(&rbac),
        ));
        let contract_service = Arc::new(ContractService::new(
            Arc::clone(&contract_repo),
            Arc::clone(&serial_repo),
            Arc::clone(&ticket_repo),
            Arc::clone(&history_repo),
            Arc::clone(&rbac),
        ));
        let ticket_service = Arc::new(TicketService::new(
            Arc::clone(&ticket_repo),
            Arc::clone(&serial_repo),
            Arc::clone(&product_repo),
            Arc::clone(&user_repo),
            Arc::clone(&notification_repo),
            mailer,
            templates,
            Arc::clone(&rbac),
        ));
        let serial_service = Arc::new(SerialService::new(
            Arc::clone(&serial_repo),
            product_repo,
            Arc::clone(&contract_repo),
            Arc::clone(&ticket_repo),
            Arc::clone(&history_repo),
            Arc::clone(&ticket_service),
            Arc::clone(&rbac),
        ));
        let warranty_history_service = Arc::new(WarrantyHistoryService::new(
            history_repo,
            Arc::clone(&serial_repo),
            Arc::clone(&rbac),
        ));
        let notification_service = Arc::new(NotificationService::new(
            notification_repo,
            user_repo,
            rbac,
        ));
        let dashboard_service = Arc::new(DashboardService::new(stats_repo, &config.dashboard));
        let portal_service = Arc::new(PortalService::new(
            Arc::clone(&contract_repo),
            Arc::clone(&serial_repo),
            ticket_repo,
            Arc::clone(&serial_service),
            Arc::clone(&ticket_service),
            Arc::clone(&notification_service),
        ));
        let expiry_sweep = Arc::new(ExpirySweep::new(
            serial_repo,
            contract_repo,
            Arc::clone(&notification_service),
            &config.worker,
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            jwt_decoder,
            user_service,
            admin_user_service,
            product_service,
            contract_service,
            serial_service,
            ticket_service,
            warranty_history_service,
            notification_service,
            dashboard_service,
            portal_service,
            expiry_sweep,
        })
    }
}
