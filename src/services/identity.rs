//! Bearer credential verification

use async_trait::async_trait;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
};

/// Identity established from a verified bearer credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: String,
}

impl VerifiedIdentity {
    /// Fail with 403 unless `requested` names this identity
    pub fn require_email(&self, requested: &str) -> AppResult<()> {
        if self.email == requested {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Requested email does not match the authenticated user".to_string(),
            ))
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Validate `token` and return the identity it proves
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity>;
}

/// JWT claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// HS256 JWT verifier with optional issuer and audience checks
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::default();
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity> {
        let data = decode::<TokenClaims>(token, &self.key, &self.validation)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        if data.claims.email.trim().is_empty() {
            return Err(AppError::Authentication("Token carries no email claim".to_string()));
        }

        Ok(VerifiedIdentity { email: data.claims.email })
    }
}
