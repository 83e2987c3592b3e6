use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use nusa_core::{CurrentUser, Role};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        CurrentUser {
            user_id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

/// Issues an HS256 token for `user`, valid for `expiration_seconds`.
pub fn encode_token(
    secret: &str,
    user: &CurrentUser,
    expiration_seconds: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let ttl = i64::try_from(expiration_seconds).unwrap_or(i64::MAX);
    let exp = (Utc::now() + Duration::seconds(ttl)).timestamp();
    let claims = Claims {
        sub: user.user_id.clone(),
        name: user.name.clone(),
        role: user.role,
        exp: usize::try_from(exp).unwrap_or(0),
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

fn current_user(req: &Request, secret: &str) -> Result<CurrentUser, StatusCode> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    Ok(token_data.claims.into())
}

// ============================================================================
// Customer Authentication Middleware
// ============================================================================

/// Any signed-in user. Admins may use the customer routes too.
pub async fn customer_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = current_user(&req, &state.auth.secret)?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

// ============================================================================
// Admin Authentication Middleware
// ============================================================================

pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = current_user(&req, &state.auth.secret)?;

    if !user.is_admin() {
        tracing::warn!("Non-admin user {} denied admin access", user.user_id);
        return Err(StatusCode::FORBIDDEN);
    }

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip_keeps_role() {
        let user = CurrentUser::admin("admin-1", "Dewi");
        let token = encode_token("secret", &user, 60).unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(CurrentUser::from(decoded.claims), user);
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let token = encode_token("secret", &CurrentUser::customer("u1", "Ana"), 60).unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"another"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
