//! Credentials for authenticating API requests.

/// Credential presented with every API request.
///
/// The Checks API distinguishes who is calling: read operations work with an
/// ordinary user token, but mutations (create/update) are only accepted from
/// the GitHub App installation that owns the check run. Callers pick the
/// variant accordingly; the server enforces the rule and the client surfaces
/// a violation as [`crate::Error::Forbidden`].
#[derive(Clone)]
pub enum Credential {
    /// A personal access token for an ordinary user.
    Token(String),
    /// A token scoped to a GitHub App installation.
    Installation(String),
}

impl Credential {
    /// Create a user-token credential.
    pub fn token(secret: impl Into<String>) -> Self {
        Credential::Token(secret.into())
    }

    /// Create an installation-token credential.
    pub fn installation(secret: impl Into<String>) -> Self {
        Credential::Installation(secret.into())
    }

    /// Whether this credential is scoped to an App installation.
    #[must_use]
    pub fn is_installation(&self) -> bool {
        matches!(self, Credential::Installation(_))
    }

    /// Render the `Authorization` header value.
    pub(crate) fn authorization(&self) -> String {
        format!("Bearer {}", self.secret())
    }

    fn secret(&self) -> &str {
        match self {
            Credential::Token(s) | Credential::Installation(s) => s,
        }
    }
}

// Tokens must never end up in logs, so Debug hides the secret.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Token(_) => f.write_str("Credential::Token(***)"),
            Credential::Installation(_) => f.write_str("Credential::Installation(***)"),
        }
    }
}
