use crate::error::SessionError;
use core_types::User;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// An authenticated session: the bearer token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Persistence for the session between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Keeps the session as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Session>(&text) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file.");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_vec_pretty(session)?;

        // The file holds a bearer token; it is created private to the owner.
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies on creation; tighten files left by older runs.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(&contents)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the session in memory only; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// The current authentication state, backed by a [`SessionStore`].
///
/// Shared between the HTTP client (which reads the token and clears the session on
/// a 401) and the application shell (which logs in and out).
pub struct AuthSession {
    store: Box<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl AuthSession {
    /// Restores whatever session `store` holds.
    pub fn load(store: impl SessionStore + 'static) -> Result<Self, SessionError> {
        let current = store.load()?;
        Ok(Self {
            store: Box::new(store),
            current: RwLock::new(current),
        })
    }

    /// A logged-out session that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemorySessionStore::default()),
            current: RwLock::new(None),
        }
    }

    /// Stores `session` as the active one and persists it.
    pub fn login(&self, session: Session) -> Result<(), SessionError> {
        self.store.save(&session)?;
        tracing::info!(
            user = session.user.as_ref().map(|u| u.username.as_str()).unwrap_or("?"),
            "Session stored."
        );
        *self.write() = Some(session);
        Ok(())
    }

    /// Forgets the active session, in memory and in the store.
    pub fn logout(&self) -> Result<(), SessionError> {
        *self.write() = None;
        self.store.clear()
    }

    /// Drops the session after the backend rejected its token.
    pub fn clear(&self) -> Result<(), SessionError> {
        if self.is_authenticated() {
            tracing::warn!("Backend rejected the session token; clearing the stored session.");
        }
        self.logout()
    }

    pub fn current(&self) -> Option<User> {
        self.read().as_ref().and_then(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    /// Replaces the stored user after a profile update. Does nothing when logged out.
    pub fn update_user(&self, user: User) -> Result<(), SessionError> {
        let mut guard = self.write();
        let Some(session) = guard.as_mut() else {
            return Ok(());
        };
        session.user = Some(user);
        self.store.save(session)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token.
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .field("user", &self.current().map(|u| u.username))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            id: 1,
            username: name.to_string(),
            email: format!("{}@example.org", name),
            created_at: None,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pitchside-session-{}-{}", name, std::process::id()))
            .join("nested")
            .join("session.json")
    }

    #[test]
    fn starts_logged_out() {
        let auth = AuthSession::in_memory();
        assert!(!auth.is_authenticated());
        assert!(auth.current().is_none());
        assert!(auth.token().is_none());
    }

    #[test]
    fn login_logout_cycle() {
        let auth = AuthSession::in_memory();
        auth.login(Session { token: "abc".to_string(), user: Some(user("ana")) }).unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(auth.token().as_deref(), Some("abc"));
        assert_eq!(auth.current().unwrap().username, "ana");

        auth.update_user(user("ana.silva")).unwrap();
        assert_eq!(auth.current().unwrap().username, "ana.silva");

        auth.logout().unwrap();
        assert!(!auth.is_authenticated());
        // Updating a logged-out session is a no-op.
        auth.update_user(user("ghost")).unwrap();
        assert!(auth.current().is_none());
    }

    #[test]
    fn file_store_survives_a_restart() {
        let path = temp_path("restart");
        {
            let auth = AuthSession::load(FileSessionStore::new(&path)).unwrap();
            assert!(!auth.is_authenticated());
            auth.login(Session { token: "tok".to_string(), user: Some(user("rui")) }).unwrap();
        }
        let auth = AuthSession::load(FileSessionStore::new(&path)).unwrap();
        assert_eq!(auth.token().as_deref(), Some("tok"));
        assert_eq!(auth.current().unwrap().username, "rui");

        auth.clear().unwrap();
        assert!(!path.exists());
        // Clearing twice is fine.
        auth.clear().unwrap();
        fs::remove_dir_all(path.parent().unwrap().parent().unwrap()).ok();
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private_to_the_owner() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("mode");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        // A file left readable by an older version gets tightened on the next save.
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileSessionStore::new(&path);
        store.save(&Session { token: "tok".to_string(), user: None }).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);

        store.clear().unwrap();
        store.save(&Session { token: "tok2".to_string(), user: None }).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(store.load().unwrap().unwrap().token, "tok2");

        fs::remove_dir_all(path.parent().unwrap().parent().unwrap()).ok();
    }

    #[test]
    fn corrupt_file_counts_as_logged_out() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        let auth = AuthSession::load(FileSessionStore::new(&path)).unwrap();
        assert!(!auth.is_authenticated());
        fs::remove_dir_all(path.parent().unwrap().parent().unwrap()).ok();
    }

    #[test]
    fn debug_output_hides_the_token() {
        let auth = AuthSession::in_memory();
        auth.login(Session { token: "super-secret".to_string(), user: None }).unwrap();
        let printed = format!("{:?}", auth);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("authenticated: true"));
    }
}
