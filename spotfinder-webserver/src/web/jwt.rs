use anyhow::Result;
use jwt_service::JwtService;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user id
    sub: String,
    /// Expiry time as Unix timestamp
    exp: usize,
}

/// Verifies bearer tokens that are issued by the identity service
/// sharing our secret.
pub struct JwtState {
    jwt_service: JwtService,
    time_valid: Duration,
}

impl JwtState {
    /// Without a shared secret only tokens issued by this
    /// instance are accepted.
    pub fn new(secret: Option<&str>) -> Self {
        let jwt_service = match secret {
            Some(secret) => JwtService::with_secret(secret),
            None => {
                warn!("No JWT secret configured, using a random one");
                JwtService::random()
            }
        };
        Self {
            jwt_service,
            time_valid: Duration::days(1),
        }
    }

    pub fn generate_token(&self, user_id: &str) -> Result<String> {
        let exp = usize::try_from((OffsetDateTime::now_utc() + self.time_valid).unix_timestamp())?;
        let claims = Claims {
            sub: user_id.to_string(),
            exp,
        };
        self.jwt_service.encode(&claims)
    }

    pub fn validate_token_and_get_user_id(&self, token: &str) -> Result<String> {
        let claims = self.jwt_service.decode(token)?;
        Ok(claims.sub)
    }
}

#[cfg(feature = "jwt")]
mod jwt_service {
    use super::{Claims, Result};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

    struct Key {
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
    }

    impl Key {
        fn new(secret: &[u8]) -> Self {
            Self {
                encoding_key: EncodingKey::from_secret(secret),
                decoding_key: DecodingKey::from_secret(secret),
            }
        }
    }

    pub struct JwtService {
        key: Key,
    }

    impl JwtService {
        pub fn with_secret(secret: &str) -> Self {
            Self {
                key: Key::new(secret.as_bytes()),
            }
        }

        pub fn random() -> Self {
            let secret = STANDARD.encode(rand::random::<[u8; 32]>());
            Self::with_secret(&secret)
        }

        pub fn encode(&self, claims: &Claims) -> Result<String> {
            let token = encode(&Header::default(), claims, &self.key.encoding_key)?;
            Ok(token)
        }

        pub fn decode(&self, token: &str) -> Result<Claims> {
            let token_data =
                decode::<Claims>(token, &self.key.decoding_key, &Validation::default())?;
            Ok(token_data.claims)
        }
    }
}

#[cfg(not(feature = "jwt"))]
mod jwt_service {
    use super::{Claims, Result};
    use anyhow::bail;

    pub struct JwtService;

    impl JwtService {
        pub fn with_secret(_secret: &str) -> Self {
            Self
        }
        pub fn random() -> Self {
            Self
        }
        pub fn encode(&self, _claims: &Claims) -> Result<String> {
            bail!("JWT support is disabled")
        }
        pub fn decode(&self, _token: &str) -> Result<Claims> {
            bail!("JWT support is disabled")
        }
    }
}
