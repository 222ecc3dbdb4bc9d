use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use persistence::repositories::{ExpenseRepository, GroupRepository, UserRepository};
use shared::jwt::JwtConfig;
use shared::redaction::Sanitizer;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, request_log};
use crate::routes::{expenses, groups, health, users};
use crate::services::{ExpenseService, GroupService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub sanitizer: Arc<Sanitizer>,
    pub users: UserService,
    pub groups: GroupService,
    pub expenses: ExpenseService,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        let jwt = Arc::new(JwtConfig::from_rsa_pem(
            &config.jwt.private_key,
            &config.jwt.public_key,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?);
        let sanitizer = Arc::new(Sanitizer::new(config.logging.redact_fields.iter().cloned()));

        let user_repo = UserRepository::new(pool.clone());
        let group_repo = GroupRepository::new(pool.clone());
        let expense_repo = ExpenseRepository::new(pool.clone());

        Ok(Self {
            users: UserService::new(user_repo.clone(), jwt.clone())?,
            groups: GroupService::new(group_repo.clone(), user_repo.clone(), expense_repo.clone()),
            expenses: ExpenseService::new(expense_repo, group_repo, user_repo),
            pool,
            config: Arc::new(config),
            jwt,
            sanitizer,
        })
    }
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let state = AppState::new(config, pool)?;
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                HeaderName::from_static("x-request-id"),
            ])
    };

    let user_routes = Router::new()
        .route(
            "/users",
            get(users::get_users)
                .post(users::create_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/login", post(users::login));

    let group_routes = Router::new()
        .route(
            "/groups",
            get(groups::get_groups)
                .post(groups::create_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route(
            "/groups/members",
            post(groups::add_member).delete(groups::remove_member),
        );

    let expense_routes = Router::new().route(
        "/expenses",
        get(expenses::get_expenses)
            .post(expenses::create_expense)
            .put(expenses::update_expense)
            .delete(expenses::delete_expense),
    );

    let public_routes = Router::new()
        .route("/heartbeat", get(health::heartbeat))
        .route("/metrics", get(metrics_handler));

    // Later layers wrap earlier ones.
    Ok(Router::new()
        .merge(user_routes)
        .merge(group_routes)
        .merge(expense_routes)
        .merge(public_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), request_log))
        .layer(cors)
        .with_state(state))
}
