use async_trait::async_trait;
use parking_lot::RwLock;

/// Source of bearer tokens for authenticated requests.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// `None` when the user is not signed in.
    async fn bearer_token(&self) -> Option<String>;
}

/// A token that is set and cleared by the application.
#[derive(Debug, Default)]
pub struct SessionToken {
    token: RwLock<Option<String>>,
}

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

#[async_trait]
impl CredentialProvider for SessionToken {
    async fn bearer_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

pub(crate) async fn authorization_header(credentials: &dyn CredentialProvider) -> Option<String> {
    credentials
        .bearer_token()
        .await
        .map(|token| format!("Bearer {token}"))
}
