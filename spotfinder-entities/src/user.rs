use std::fmt;

/// Identity of an authenticated user as asserted by the credential provider.
///
/// The service never stores credentials. It only keeps this opaque subject
/// to attribute ratings and favorites.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl From<String> for UserId {
    fn from(from: String) -> Self {
        Self(from)
    }
}

impl From<&str> for UserId {
    fn from(from: &str) -> Self {
        Self(from.to_owned())
    }
}

impl From<UserId> for String {
    fn from(from: UserId) -> Self {
        from.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
