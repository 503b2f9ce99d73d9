use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    api::models::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        employees::EmployeeResponse,
    },
    auth::{password, resolver, token},
    errors::Error,
    store::{NewEmployee, Role},
    AppState,
};

/// Register a new employee account
///
/// New accounts always start as USER; promotion is a separate, privileged
/// operation.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Employee registered successfully", body = EmployeeResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "An account with this email already exists"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<EmployeeResponse>, Error> {
    request.validate()?;

    // Hash the password on a blocking thread to avoid blocking the async runtime
    let password_hash = tokio::task::spawn_blocking({
        let password = request.password.clone();
        move || password::hash_password(&password)
    })
    .await
    .map_err(|e| Error::Internal {
        operation: format!("spawn password hashing task: {e}"),
    })??;

    let employee = state
        .store
        .create(NewEmployee {
            name: request.name,
            email: request.email,
            password_hash,
            role: Role::User,
        })
        .await?;

    Ok(Json(EmployeeResponse::from(employee)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, Error> {
    request.validate()?;

    let employee = resolver::authenticate(state.store.as_ref(), &request.email, &request.password).await?;

    let (token, expires_in) = token::issue_token(&employee.email, &state.secret_key, state.config.token_ttl)?;

    Ok(Json(LoginResponse::new(employee, token, expires_in)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_state;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn auth_server() -> TestServer {
        let app = axum::Router::new()
            .route("/api/v1/auth/register", post(register))
            .route("/api/v1/auth/login", post(login))
            .with_state(create_test_state());
        TestServer::new(app).unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn test_register_returns_the_new_employee() {
        let server = auth_server();

        let response = server
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": "John Doe",
                "email": "john.doe@example.com",
                "password": "Sup3rSecret",
            }))
            .await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["name"], "John Doe");
        assert_eq!(body["email"], "john.doe@example.com");
        assert_eq!(body["role"], "USER");
        assert!(body["createdAt"].is_string());
        // The hash must never appear in a response, under any name.
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_register_rejects_a_taken_email() {
        let server = auth_server();
        let request = json!({
            "name": "John Doe",
            "email": "john.doe@example.com",
            "password": "Sup3rSecret",
        });

        server.post("/api/v1/auth/register").json(&request).await.assert_status(StatusCode::OK);

        let response = server.post("/api/v1/auth/register").json(&request).await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["message"], "An account with this email already exists");
    }

    #[test_log::test(tokio::test)]
    async fn test_register_reports_field_errors() {
        let server = auth_server();

        let response = server
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": "x",
                "email": "not-an-email",
                "password": "short",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["status"], 400);
        assert_eq!(body["errors"]["name"], "Name must be between 3 and 30 characters");
        assert_eq!(body["errors"]["email"], "Email format should be valid");
        assert_eq!(
            body["errors"]["password"],
            "Password must be at least 8 characters long"
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_login_returns_a_token() {
        let server = auth_server();

        server
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": "John Doe",
                "email": "john.doe@example.com",
                "password": "Sup3rSecret",
            }))
            .await
            .assert_status(StatusCode::OK);

        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({
                "email": "john.doe@example.com",
                "password": "Sup3rSecret",
            }))
            .await;

        response.assert_status(StatusCode::OK);
        let body: LoginResponse = response.json();
        assert!(!body.token.is_empty());
        assert_eq!(body.token_expires_in, 3600);
        assert_eq!(body.email, "john.doe@example.com");
        assert_eq!(body.role, Role::User);
    }

    #[test_log::test(tokio::test)]
    async fn test_login_failures_are_uniform() {
        let server = auth_server();

        server
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": "John Doe",
                "email": "john.doe@example.com",
                "password": "Sup3rSecret",
            }))
            .await
            .assert_status(StatusCode::OK);

        let unknown = server
            .post("/api/v1/auth/login")
            .json(&json!({
                "email": "nobody@example.com",
                "password": "Sup3rSecret",
            }))
            .await;
        unknown.assert_status(StatusCode::UNAUTHORIZED);

        let wrong_password = server
            .post("/api/v1/auth/login")
            .json(&json!({
                "email": "john.doe@example.com",
                "password": "Wr0ngPassword",
            }))
            .await;
        wrong_password.assert_status(StatusCode::UNAUTHORIZED);

        // Identical bodies: a caller cannot probe which emails exist.
        let unknown_body: Value = unknown.json();
        let wrong_body: Value = wrong_password.json();
        assert_eq!(unknown_body["message"], "Invalid email or password");
        assert_eq!(unknown_body["message"], wrong_body["message"]);
        assert_eq!(unknown_body["status"], wrong_body["status"]);
    }
}
