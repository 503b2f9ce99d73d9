//! OpenAPI documentation configuration.
//!
//! Defines the OpenAPI spec for the `/api/v1/*` routes. The rendered docs are
//! served at `/docs`, the raw spec at `/api-docs/openapi.json`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Registers the bearer scheme the protected routes reference.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Bearer token authentication. Obtain a token from \
                            `POST /api/v1/auth/login` and send it in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::employees::me,
        api::handlers::employees::view_by_email,
        api::handlers::employees::update_my_info,
        api::handlers::employees::delete_my_account,
        api::handlers::employees::delete_employee,
        api::handlers::employees::promote_employee,
        api::handlers::employees::demote_employee,
        api::handlers::employees::list_employees,
    ),
    components(schemas(
        api::models::auth::RegisterRequest,
        api::models::auth::LoginRequest,
        api::models::auth::LoginResponse,
        api::models::employees::EmployeeResponse,
        api::models::employees::EmployeePageResponse,
        crate::store::Role,
    )),
    tags(
        (name = "authentication", description = "Registration and login"),
        (name = "employees", description = "Employee directory operations"),
    )
)]
pub struct ApiDoc;
