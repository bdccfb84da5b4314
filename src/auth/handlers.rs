use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{auth::jwt, config::Config, error::ApiError};

// Temporary credential pair, not a user store.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(config, body), fields(username = %body.username))]
pub async fn login(
    body: web::Json<LoginRequest>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    if body.username != ADMIN_USERNAME || body.password != ADMIN_PASSWORD {
        warn!("login rejected");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token =
        jwt::generate_token(&body.username, &config).map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("login succeeded");
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}
