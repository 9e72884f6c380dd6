use rocket::{
    self,
    request::{FromRequest, Outcome, Request},
    State,
};

use crate::web::jwt;
use spotfinder_application::error::AppError;
use spotfinder_core::{entities::UserId, usecases::Error as ParameterError};

type Result<T> = std::result::Result<T, AppError>;

fn get_bearer_token(auth_header_val: &str) -> Option<&str> {
    let x: Vec<_> = auth_header_val.split(' ').collect();
    if x.len() == 2 && x[0] == "Bearer" {
        Some(x[1])
    } else {
        None
    }
}

#[derive(Debug)]
pub struct Auth {
    user_id: Option<UserId>,
}

impl Auth {
    pub fn user_id(&self) -> Result<&UserId> {
        self.user_id
            .as_ref()
            .ok_or_else(|| ParameterError::Unauthorized.into())
    }

    /// The authenticated user, if any, for operations that
    /// may be anonymous.
    pub fn optional_user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    fn bearer_tokens_from_header(request: &Request) -> Vec<String> {
        request
            .headers()
            .get("Authorization")
            .filter_map(get_bearer_token)
            .map(ToOwned::to_owned)
            .collect()
    }

    async fn user_id_from_jwt_in_header(
        request: &Request<'_>,
        bearer_tokens: &[String],
    ) -> Option<UserId> {
        let jwt_state = request.guard::<&State<jwt::JwtState>>().await.succeeded()?;
        bearer_tokens
            .iter()
            .filter_map(|token| jwt_state.validate_token_and_get_user_id(token).ok())
            .map(UserId::from)
            .find(UserId::is_valid)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Auth {
    type Error = ();
    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let bearer_tokens = Self::bearer_tokens_from_header(request);
        let user_id = Self::user_id_from_jwt_in_header(request, &bearer_tokens).await;
        if user_id.is_none() && !bearer_tokens.is_empty() {
            debug!("Rejected {} bearer token(s)", bearer_tokens.len());
        }
        Outcome::Success(Self { user_id })
    }
}

pub struct Version(pub &'static str);
