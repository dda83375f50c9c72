//! Credential store for the current session token.
//!
//! The store is the single owner of session state. Writers are limited to
//! login (save), unauthorized-response handling in the
//! [`Gateway`](crate::gateway::Gateway) (clear), and logout (clear);
//! everything else only reads.
//!
//! Tokens are opaque: nothing here inspects or validates them. Only the
//! remote service can judge whether a token is still good.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Key under which the token is stored in the session file.
pub const TOKEN_KEY: &str = "token";

/// Errors raised by the durable store's persistence layer.
///
/// These never escape the [`CredentialStore`] trait; they are logged and the
/// in-memory slot stays authoritative.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("session file {path}: {source}")]
    Io {
        /// Path of the session file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The session file exists but is not valid TOML.
    #[error("failed to parse session file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The token could not be serialized.
    #[error("failed to serialize session file: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Opaque bearer token proving an authenticated session.
///
/// The backing memory is zeroed on drop and `Debug` never prints it.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a token issued by the service.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for attaching to a request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Process-wide slot holding at most one session token.
///
/// Implementations must serialize access internally; the store is shared
/// between the UI loop and request tasks.
pub trait CredentialStore: Send + Sync {
    /// Persists `token`, replacing any existing one.
    fn save(&self, token: SessionToken);

    /// Returns the current token, or `None` if there is no session.
    fn load(&self) -> Option<SessionToken>;

    /// Removes the token. Clearing an empty store is a no-op.
    fn clear(&self);

    /// Returns `true` if a token is present.
    fn has_session(&self) -> bool {
        self.load().is_some()
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn save(&self, token: SessionToken) {
        (**self).save(token);
    }

    fn load(&self) -> Option<SessionToken> {
        (**self).load()
    }

    fn clear(&self) {
        (**self).clear();
    }
}

/// In-memory store. The session ends with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<SessionToken>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(SessionToken::new(token))),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn save(&self, token: SessionToken) {
        *self.slot.lock() = Some(token);
        tracing::info!("session token stored");
    }

    fn load(&self) -> Option<SessionToken> {
        self.slot.lock().clone()
    }

    fn clear(&self) {
        if self.slot.lock().take().is_some() {
            tracing::info!("session token cleared");
        }
    }
}

/// On-disk layout of the session file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    token: Option<String>,
}

/// Durable store backed by a small TOML file.
///
/// The file is read once on [`open`](Self::open); afterwards the in-memory
/// slot is authoritative and every change is written through.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    slot: Mutex<Option<SessionToken>>,
}

impl FileStore {
    /// Opens the store at `path`, loading any previously saved token.
    ///
    /// A missing, unreadable, or corrupt file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = match read_session_file(&path) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable session file");
                None
            }
        };
        Self {
            path,
            slot: Mutex::new(token),
        }
    }

    /// Default location: `<data_dir>/taskflow/session.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("taskflow").join("session.toml"))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, token: Option<&SessionToken>) -> Result<(), SessionError> {
        let Some(token) = token else {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(source) => Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                }),
            };
        };

        let mut file = SessionFile {
            token: Some(token.expose().to_string()),
        };
        let contents = toml::to_string(&file);
        file.token.zeroize();
        let mut contents = contents?;
        let written = write_private(&self.path, &contents);
        contents.zeroize();
        written.map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl CredentialStore for FileStore {
    fn save(&self, token: SessionToken) {
        let mut slot = self.slot.lock();
        if let Err(e) = self.persist(Some(&token)) {
            tracing::error!(error = %e, "failed to persist session token");
        }
        *slot = Some(token);
        drop(slot);
        tracing::info!(path = %self.path.display(), "session token stored");
    }

    fn load(&self) -> Option<SessionToken> {
        self.slot.lock().clone()
    }

    fn clear(&self) {
        let mut slot = self.slot.lock();
        let had_token = slot.take().is_some();
        if let Err(e) = self.persist(None) {
            tracing::error!(error = %e, "failed to remove session file");
        }
        drop(slot);
        if had_token {
            tracing::info!("session token cleared");
        }
    }
}

fn read_session_file(path: &Path) -> Result<Option<SessionToken>, SessionError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SessionError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let file: SessionFile = toml::from_str(&contents)?;
    Ok(file
        .token
        .filter(|t| !t.is_empty())
        .map(SessionToken::new))
}

/// Writes `contents` to `path`, readable only by the owner on unix.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
