use crate::error::CredentialError;
use crate::models::{AdminConfig, Role, User};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Result of [`CredentialStore::create`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Trait for user account storage
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by exact username and password. The password is stripped
    /// from the returned user.
    async fn lookup(&self, username: &str, password: &str) -> Option<User>;

    /// All users, without passwords
    async fn list(&self) -> Vec<User>;

    /// Add a user with the `user` role
    async fn create(&self, username: &str, password: &str)
        -> Result<CreateOutcome, CredentialError>;

    /// Remove a user. Returns false for the admin and unknown usernames.
    async fn delete(&self, username: &str) -> bool;

    /// Full snapshot including passwords
    async fn export(&self) -> Vec<User>;

    /// Replace all users with a JSON snapshot. Returns the number of users
    /// stored afterwards.
    async fn import(&self, snapshot: &str) -> Result<usize, CredentialError>;
}

/// In-memory credential storage seeded with the configured admin
pub struct InMemoryCredentialStore {
    admin: AdminConfig,
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryCredentialStore {
    pub fn new(admin: AdminConfig) -> Self {
        let mut users = Vec::new();
        ensure_admin(&mut users, &admin);
        Self {
            admin,
            users: Arc::new(RwLock::new(users)),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new(AdminConfig::default())
    }
}

/// Re-create the configured admin if it is missing, otherwise reset its
/// password and role to the configured ones.
fn ensure_admin(users: &mut Vec<User>, admin: &AdminConfig) {
    match users.iter_mut().find(|u| u.username == admin.username) {
        Some(user) => {
            user.password = Some(admin.password.clone());
            user.role = Role::Admin;
        }
        None => {
            tracing::info!(username = %admin.username, "Seeding admin user");
            users.insert(
                0,
                User::new(admin.username.clone(), admin.password.clone(), Role::Admin),
            );
        }
    }
}

/// Parse and validate an exported snapshot.
fn parse_snapshot(snapshot: &str) -> Result<Vec<User>, CredentialError> {
    let users: Vec<User> = serde_json::from_str(snapshot)
        .map_err(|e| CredentialError::InvalidSnapshot(e.to_string()))?;

    for (i, user) in users.iter().enumerate() {
        if user.username.trim().is_empty() {
            return Err(CredentialError::InvalidSnapshot(format!(
                "entry {i} has an empty username"
            )));
        }
        if user.password.as_deref().map_or(true, str::is_empty) {
            return Err(CredentialError::InvalidSnapshot(format!(
                "entry {i} ({}) has no password",
                user.username
            )));
        }
    }
    Ok(users)
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn lookup(&self, username: &str, password: &str) -> Option<User> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.username == username && u.password.as_deref() == Some(password))
            .map(User::without_password)
    }

    async fn list(&self) -> Vec<User> {
        let users = self.users.read().await;
        users.iter().map(User::without_password).collect()
    }

    async fn create(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CreateOutcome, CredentialError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }

        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        users.push(User::new(username, password, Role::User));
        tracing::info!(username, "User created");
        Ok(CreateOutcome::Created)
    }

    async fn delete(&self, username: &str) -> bool {
        if username == self.admin.username {
            return false;
        }
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.username != username);
        let removed = users.len() != before;
        if removed {
            tracing::info!(username, "User deleted");
        }
        removed
    }

    async fn export(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    async fn import(&self, snapshot: &str) -> Result<usize, CredentialError> {
        let mut imported = parse_snapshot(snapshot)?;
        ensure_admin(&mut imported, &self.admin);

        let mut users = self.users.write().await;
        *users = imported;
        tracing::info!(count = users.len(), "Users imported");
        Ok(users.len())
    }
}
