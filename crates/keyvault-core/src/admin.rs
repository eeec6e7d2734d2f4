//! Admin gate for the waitlist overlay.
//!
//! The overlay moves through three states:
//!
//! ```text
//! Hidden --open--> PasswordPrompt --correct password--> Authenticated
//!   ^                    |  ^                                |
//!   |                    |  +----wrong password--------------+ (stays)
//!   +-------close--------+-----------close-------------------+
//! ```
//!
//! The password is one shared secret. It keeps casual visitors out of the
//! listing and nothing more: it is not a security boundary, there is no
//! lockout, and the default value is a placeholder.
//!
//! A successful login issues an opaque session token. Only the SHA-256 hash
//! of the token is kept, in memory, until the overlay is closed, the session
//! is older than [`SESSION_TTL`], or [`MAX_SESSIONS`] newer logins push it
//! out.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::AdminError;

/// Placeholder password used when none is configured.
pub const PLACEHOLDER_PASSWORD: &str = "keyvault2024";

/// How long an admin session stays open without being closed.
pub const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Open sessions kept at once; the oldest is dropped to make room.
pub const MAX_SESSIONS: usize = 32;

/// Where the admin overlay currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminView {
    /// Only the toggle button is visible.
    Hidden,
    /// The overlay asks for the password.
    PasswordPrompt,
    /// The overlay shows the listing, export and clear actions.
    Authenticated,
}

impl AdminView {
    /// Show the overlay. Has no effect once it is already showing.
    #[must_use]
    pub fn open(self) -> Self {
        match self {
            Self::Hidden => Self::PasswordPrompt,
            other => other,
        }
    }

    /// Submit a password from the prompt.
    ///
    /// Outside the prompt the view is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidPassword`] when the prompt receives the
    /// wrong password; the overlay stays on the prompt.
    pub fn submit(self, gate: &AdminGate, password: &str) -> Result<Self, AdminError> {
        match self {
            Self::PasswordPrompt => {
                gate.verify(password)?;
                Ok(Self::Authenticated)
            }
            other => Ok(other),
        }
    }

    /// Hide the overlay, discarding any authentication.
    #[must_use]
    pub fn close(self) -> Self {
        Self::Hidden
    }

    /// Whether entries may be listed, exported or cleared in this state.
    #[must_use]
    pub fn can_manage_entries(self) -> bool {
        self == Self::Authenticated
    }
}

/// One open session: the token hash and when it was issued.
struct Session {
    hash: String,
    opened: Instant,
}

/// Shared-secret check plus the open admin sessions, oldest first.
pub struct AdminGate {
    password: String,
    sessions: RwLock<VecDeque<Session>>,
    ttl: Duration,
}

impl AdminGate {
    /// Create a gate for the given password.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self::with_session_ttl(password, SESSION_TTL)
    }

    fn with_session_ttl(password: impl Into<String>, ttl: Duration) -> Self {
        Self {
            password: password.into(),
            sessions: RwLock::new(VecDeque::new()),
            ttl,
        }
    }

    /// Whether the gate still uses [`PLACEHOLDER_PASSWORD`].
    #[must_use]
    pub fn uses_placeholder(&self) -> bool {
        self.password == PLACEHOLDER_PASSWORD
    }

    /// Compare `candidate` with the configured password in constant time.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidPassword`] on mismatch.
    pub fn verify(&self, candidate: &str) -> Result<(), AdminError> {
        if bool::from(self.password.as_bytes().ct_eq(candidate.as_bytes())) {
            Ok(())
        } else {
            Err(AdminError::InvalidPassword)
        }
    }

    /// Run the prompt with `password` and open a session on success.
    ///
    /// Returns the plaintext session token, which is never stored.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidPassword`] on a wrong password.
    pub async fn login(&self, password: &str) -> Result<String, AdminError> {
        if let Err(e) = AdminView::Hidden.open().submit(self, password) {
            warn!("admin login rejected");
            return Err(e);
        }

        let token = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        self.expire(&mut sessions);
        while sessions.len() >= MAX_SESSIONS {
            sessions.pop_front();
        }
        sessions.push_back(Session {
            hash: hash_session(&token),
            opened: Instant::now(),
        });
        info!(open = sessions.len(), "admin session opened");
        Ok(token)
    }

    /// The overlay state for a request carrying `token`.
    ///
    /// A live session is [`AdminView::Authenticated`]; anything else has
    /// just opened the overlay and sees the prompt.
    pub async fn view(&self, token: Option<&str>) -> AdminView {
        let live = match token {
            Some(token) => {
                let hash = hash_session(token);
                let mut sessions = self.sessions.write().await;
                self.expire(&mut sessions);
                sessions.iter().any(|s| s.hash == hash)
            }
            None => false,
        };
        if live {
            AdminView::Authenticated
        } else {
            AdminView::Hidden.open()
        }
    }

    /// Require a live session.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] if `token` is absent or closed.
    pub async fn authorize(&self, token: Option<&str>) -> Result<(), AdminError> {
        if self.view(token).await.can_manage_entries() {
            Ok(())
        } else {
            Err(AdminError::NotAuthenticated)
        }
    }

    /// Close the overlay for `token`, ending its session.
    ///
    /// Closing an unknown or already closed session is a no-op.
    pub async fn close(&self, token: Option<&str>) -> AdminView {
        if let Some(token) = token {
            let hash = hash_session(token);
            let mut sessions = self.sessions.write().await;
            if let Some(pos) = sessions.iter().position(|s| s.hash == hash) {
                sessions.remove(pos);
                info!("admin session closed");
            }
        }
        AdminView::Authenticated.close()
    }

    /// Drop sessions older than the TTL. Sessions are kept in issue order,
    /// so the expired ones are all at the front.
    fn expire(&self, sessions: &mut VecDeque<Session>) {
        while sessions
            .front()
            .is_some_and(|s| s.opened.elapsed() >= self.ttl)
        {
            sessions.pop_front();
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

/// Hex-encoded SHA-256 of a session token.
fn hash_session(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
