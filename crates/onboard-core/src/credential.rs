/// An opaque secret token injected by the hosting environment.
///
/// The token is scoped to the lifetime of a single dispatch: it reaches the
/// batch subprocess through its environment, never through argv, and is
/// redacted from Debug output so it cannot leak into logs or error chains.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the token from the environment. Returns None when the variable
    /// is unset or empty.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .filter(|t| !t.is_empty())
            .map(Self::new)
    }

    /// Access the raw token. Callers must only pass it through channels
    /// invisible to logs (subprocess env, auth headers).
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(<redacted>)")
    }
}
