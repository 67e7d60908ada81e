//! Bearer credential provision
//!
//! The token store itself is an external collaborator; the fetcher only
//! needs a way to ask for the current credential at request time.

/// Source of the bearer credential attached to every page request
pub trait TokenProvider: Send + Sync {
    /// Current credential, or `None` when the caller is signed out
    fn bearer_token(&self) -> Option<String>;
}

/// Reads the credential from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    /// Read from the given environment variable
    #[inline]
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new("PAGESYNC_TOKEN")
    }
}

impl TokenProvider for EnvTokenProvider {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|t| !t.is_empty())
    }
}

/// Fixed credential, for tests and short-lived tooling
#[derive(Debug, Clone)]
pub struct StaticTokenProvider(String);

impl StaticTokenProvider {
    /// Provide a fixed credential
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticTokenProvider {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_provider_always_yields() {
        let provider = StaticTokenProvider::new("secret");
        assert_eq!(provider.bearer_token().as_deref(), Some("secret"));
    }

    #[test]
    fn env_provider_treats_empty_as_absent() {
        let provider = EnvTokenProvider::new("PAGESYNC_TEST_EMPTY_TOKEN");
        std::env::set_var("PAGESYNC_TEST_EMPTY_TOKEN", "");
        assert_eq!(provider.bearer_token(), None);
        std::env::remove_var("PAGESYNC_TEST_EMPTY_TOKEN");
    }
}
