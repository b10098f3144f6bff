use super::model::AuthContext;
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Verifies HS256 access tokens issued by the identity provider
pub struct JwtValidator {
    decoding_key: DecodingKey,
    issuer: Option<String>,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: SubjectClaim,
    #[serde(rename = "exp")]
    _exp: u64,
    #[serde(default)]
    is_staff: bool,
}

/// Subject can be encoded either as a JSON number or a decimal string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SubjectClaim {
    Number(i64),
    Text(String),
}

impl SubjectClaim {
    fn user_id(&self) -> Option<i64> {
        match self {
            SubjectClaim::Number(id) => Some(*id),
            SubjectClaim::Text(raw) => raw.parse().ok(),
        }
    }
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthContext, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Unauthorized(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Unauthorized(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?
            .claims;

        let user_id = claims
            .sub
            .user_id()
            .ok_or_else(|| AppError::Unauthorized("Token subject is not a user id".to_string()))?;

        Ok(AuthContext::new(user_id, claims.is_staff))
    }
}
