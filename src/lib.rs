//! # rosterd: Employee Directory Service
//!
//! `rosterd` is a small employee directory with token-based authentication and
//! role-based authorization. It provides a RESTful API for registration, login,
//! profile self-service, and privileged directory administration.
//!
//! ## Overview
//!
//! Every employee record carries one of three roles, `USER < ADMIN <
//! SUPERADMIN`. Anyone can register (always as USER) and log in; a successful
//! login returns a signed, time-limited bearer token. Everything else requires
//! that token. What a caller may do then depends on their role and on who the
//! subject of the action is: admins manage users, the superadmin manages
//! admins, and a single protected superadmin account, created at startup, can
//! never be viewed, modified, demoted, or deleted through the API at all.
//!
//! ### Request Flow
//!
//! Requests first pass through the authentication gate
//! ([`auth::gate::authentication_gate`]), which skips the public
//! `/api/v1/auth/*` routes, verifies the bearer token on everything else, and
//! resolves the token's subject against the store so role changes take effect
//! immediately rather than at next login. The resolved [`auth::Principal`] is
//! attached to the request; handlers receive it as an extractor, run the
//! relevant [`auth::policy`] check, and only then touch the store.
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) exposes the handlers and wire models for the
//! `/api/v1/auth/*` and `/api/v1/employees/*` surfaces, documented with
//! OpenAPI annotations and served at `/docs`.
//!
//! The **authentication layer** ([`auth`]) owns password hashing, token
//! issuance and verification, the request gate, and the authorization policy.
//! The policy is a plain function over `(actor, action, subject)`, testable
//! without any HTTP machinery.
//!
//! The **store layer** ([`store`]) abstracts persistence behind the
//! [`store::EmployeeStore`] trait with two implementations: Postgres for real
//! deployments and an in-memory map for development and tests.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use rosterd::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = rosterd::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize telemetry (structured logging)
//!     rosterd::telemetry::init_telemetry()?;
//!
//!     // Create and start the application
//!     let app = Application::new(config).await?;
//!
//!     // Run with graceful shutdown on Ctrl+C
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod openapi;
pub mod store;
pub mod telemetry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use base64::{Engine as _, engine::general_purpose};
use bon::Builder;
use rand::prelude::RngExt;
use rand::rng;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::auth::gate::authentication_gate;
use crate::openapi::ApiDoc;
use crate::store::{DynEmployeeStore, EmployeeStore, MemoryStore, NewEmployee, PgStore, Role};

pub use config::Config;
pub use types::EmployeeId;

/// Application state shared across all request handlers.
///
/// # Fields
///
/// - `store`: Employee persistence, Postgres or in-memory
/// - `config`: Application configuration loaded from file/environment
/// - `secret_key`: Key that signs and verifies bearer tokens. Resolved once at
///   startup so a generated fallback stays stable for the process lifetime
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: DynEmployeeStore,
    pub config: Config,
    pub secret_key: String,
}

/// Generate a random base64url-encoded 256-bit secret.
pub fn generate_secret() -> String {
    let mut secret_bytes = [0u8; 32];
    rng().fill(&mut secret_bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(secret_bytes)
}

/// Generate a password that satisfies the login composition rules.
///
/// A plain random secret could miss a digit or a letter case; the account
/// would then exist but never pass login validation.
fn generate_superadmin_password() -> String {
    loop {
        let candidate = generate_secret();
        let has_lower = candidate.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = candidate.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
        if has_lower && has_upper && has_digit {
            return candidate;
        }
    }
}

/// Create the protected superadmin account if it doesn't exist.
///
/// This function is idempotent: when a record already holds the configured
/// email it is left untouched, so restarts never reset the account. When
/// `password` is `None` a random one is generated and logged once; without
/// that log line the account would be unreachable until the next restart.
///
/// # Errors
///
/// Returns an error if the store rejects the lookup or insert. Callers treat
/// this as fatal; the directory must not come up without its superadmin.
#[instrument(skip_all)]
pub async fn create_initial_superadmin(
    store: &dyn EmployeeStore,
    email: &str,
    password: Option<&str>,
) -> anyhow::Result<EmployeeId> {
    if let Some(existing) = store.find_by_email(email).await? {
        debug!(id = existing.id, "superadmin account already exists");
        return Ok(existing.id);
    }

    let password = match password {
        Some(password) => password.to_string(),
        None => {
            let generated = generate_superadmin_password();
            warn!(
                "no superadmin_password configured; generated credentials for {email}: {generated}"
            );
            generated
        }
    };

    let password_hash = auth::password::hash_password(&password)?;
    let created = store
        .create(NewEmployee {
            name: "Super Admin".to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::SuperAdmin,
        })
        .await?;

    info!(id = created.id, "created initial superadmin account");
    Ok(created.id)
}

/// Build the application router with all endpoints and middleware.
///
/// Every route passes through the authentication gate; the gate itself skips
/// the public paths. Tracing wraps the gate so rejected requests are still
/// logged.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/v1/auth/register", post(api::handlers::auth::register))
        .route("/api/v1/auth/login", post(api::handlers::auth::login));

    let employee_routes = Router::new()
        .route("/api/v1/employees/me", get(api::handlers::employees::me))
        .route(
            "/api/v1/employees/view/{email}",
            get(api::handlers::employees::view_by_email),
        )
        .route(
            "/api/v1/employees/updateMyInfo",
            put(api::handlers::employees::update_my_info),
        )
        .route(
            "/api/v1/employees/deleteMyAccount",
            delete(api::handlers::employees::delete_my_account),
        )
        .route(
            "/api/v1/employees/delete/{id}",
            delete(api::handlers::employees::delete_employee),
        )
        .route(
            "/api/v1/employees/promote/{id}",
            put(api::handlers::employees::promote_employee),
        )
        .route(
            "/api/v1/employees/demote/{id}",
            put(api::handlers::employees::demote_employee),
        )
        .route("/api/v1/employees/list", get(api::handlers::employees::list_employees));

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(auth_routes)
        .merge(employee_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(from_fn_with_state(state.clone(), authentication_gate))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// The assembled service: a configured router ready to serve.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized.
    ///
    /// Picks the store from `database_url` (Postgres when set, in-memory
    /// otherwise), resolves the token secret, and bootstraps the superadmin
    /// account. Any failure here is fatal to process start.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting rosterd with configuration: {:#?}", config);

        let store: DynEmployeeStore = match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url).await?;
                info!("connected to Postgres");
                Arc::new(store)
            }
            None => {
                warn!("no database_url configured; using the in-memory store, data is lost on restart");
                Arc::new(MemoryStore::default())
            }
        };

        let secret_key = match &config.secret_key {
            Some(secret) => secret.clone(),
            None => {
                warn!("no secret_key configured; tokens will not survive a restart");
                generate_secret()
            }
        };

        create_initial_superadmin(
            store.as_ref(),
            &config.superadmin_email,
            config.superadmin_password.as_deref(),
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create initial superadmin: {e}"))?;

        let app_state = AppState::builder()
            .store(store)
            .config(config.clone())
            .secret_key(secret_key)
            .build();

        let router = build_router(app_state);

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "rosterd listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
