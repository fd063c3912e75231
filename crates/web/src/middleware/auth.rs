//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs minted by the identity provider; `sub` carries the
//! user id. The middleware resolves it to a `users` row and stores it in the
//! request extensions for handlers to pick up with `Extension<AuthUser>`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use storage::{
    Database,
    error::StorageError,
    models::User,
    repository::UserRepository,
    services::authorization::{Actor, Permission, Resource, is_allowed},
};
use uuid::Uuid;

use crate::error::WebError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Expiration
    pub exp: i64,
    /// Issued at
    #[serde(default)]
    pub iat: Option<i64>,
}

#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Returns the user id the token was issued for.
    pub fn verify(&self, token: &str) -> Result<Uuid, WebError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                tracing::warn!("Rejected bearer token: {}", e);
                WebError::Unauthorized
            })
    }
}

#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub verifier: Arc<TokenVerifier>,
}

impl AuthState {
    pub fn new(db: Database, secret: &str) -> Self {
        Self {
            db,
            verifier: Arc::new(TokenVerifier::new(secret)),
        }
    }
}

/// The caller, loaded from the token subject.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor::from(&self.0)
    }

    pub fn user_id(&self) -> Uuid {
        self.0.user_id
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn require_auth(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(req.headers()).ok_or(WebError::Unauthorized)?;
    let user_id = state.verifier.verify(token)?;

    let user = UserRepository::new(state.db.pool())
        .find_by_id(user_id)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => {
                tracing::warn!(%user_id, "Token subject has no user record");
                WebError::Unauthorized
            }
            other => WebError::from(other),
        })?;

    req.extensions_mut().insert(AuthUser(user));

    Ok(next.run(req).await)
}

/// Fails with `Forbidden` unless the policy allows the action.
pub fn authorize(
    user: &AuthUser,
    permission: Permission,
    resource: Resource<'_>,
) -> Result<(), WebError> {
    let actor = user.actor();
    if is_allowed(&actor, permission, resource) {
        return Ok(());
    }

    tracing::warn!(
        user_id = %actor.user_id,
        role = ?actor.role,
        ?permission,
        "Permission denied"
    );
    Err(WebError::Forbidden)
}
