//! HS256 access tokens.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tubely_core::constants::JWT_ISSUER;
use tubely_core::AppError;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    /// User ID
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Authorization header is missing".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Malformed authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthenticated("Authorization header must be a bearer token".to_string())
        })?;

    Ok(token)
}

/// Issue a token for `user_id` valid for `expires_in`.
pub fn make_jwt(user_id: Uuid, secret: &str, expires_in: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        iss: JWT_ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + expires_in).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Validate a token and return the user it was issued to.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[JWT_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Unauthenticated("Token has expired".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                AppError::Unauthenticated("Invalid token issuer".to_string())
            }
            _ => AppError::Unauthenticated("Couldn't validate JWT".to_string()),
        }
    })?;

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::Unauthenticated("Invalid token subject".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn round_trip_returns_subject() {
        let user_id = Uuid::new_v4();
        let token = make_jwt(user_id, SECRET, Duration::hours(1)).unwrap();
        assert_eq!(validate_jwt(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = make_jwt(Uuid::new_v4(), SECRET, Duration::hours(1)).unwrap();
        let err = validate_jwt(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = make_jwt(Uuid::new_v4(), SECRET, Duration::hours(-1)).unwrap();
        let err = validate_jwt(&token, SECRET).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(ref m) if m == "Token has expired"));
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            iss: "someone-else".to_string(),
            sub: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(validate_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            iss: JWT_ISSUER.to_string(),
            sub: "admin".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            validate_jwt(&token, SECRET),
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
        assert!(bearer_token(&HeaderMap::new()).is_err());
        assert!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers_with("Bearer ")).is_err());
    }
}
