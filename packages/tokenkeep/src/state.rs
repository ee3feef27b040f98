//! In-memory session state

use std::{fmt, sync::Arc};
use tokenkeep_jwt::{DecodedSession, SessionClaims, Token};

/// A token together with its decoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    /// Compact token as persisted
    pub token: Token,
    /// Decoded header and claims
    pub session: DecodedSession,
}

impl StoredSession {
    /// Claims carried by the token
    #[must_use]
    pub fn claims(&self) -> &SessionClaims {
        &self.session.claims
    }
}

/// Lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing loaded
    NoToken,
    /// A decoded token is held in memory
    Stored(Arc<StoredSession>),
}

impl SessionState {
    /// The held session, if any
    #[must_use]
    pub fn session(&self) -> Option<&Arc<StoredSession>> {
        match self {
            Self::NoToken => None,
            Self::Stored(session) => Some(session),
        }
    }
}

/// Display status of the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token loaded
    NoToken,
    /// Token loaded and not yet expired
    Valid,
    /// Token loaded but past its `exp`
    Expired,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoToken => "No Token",
            Self::Valid => "Valid",
            Self::Expired => "Expired",
        })
    }
}
