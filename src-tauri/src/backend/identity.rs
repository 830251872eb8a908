use super::DocumentStore;
use crate::error::{AuthError, StoreError};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

const ACCOUNTS: &str = "auth_accounts";
const FEDERATED: &str = "auth_federated";
const SESSIONS: &str = "auth_sessions";
const CURRENT_SESSION: &str = "current";

/// The signed-in principal. `uid` is the foreign key of every owned record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthIdentity {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// A token issued by an external sign-in provider, e.g. a Google ID token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedCredential {
    pub provider: String,
    pub id_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedProfile {
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Checks a federated token with its issuer.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, credential: &FederatedCredential) -> Result<FederatedProfile, AuthError>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<AuthIdentity, AuthError>;

    async fn sign_in_with_credential(
        &self,
        credential: &FederatedCredential,
    ) -> Result<AuthIdentity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    fn current(&self) -> Option<AuthIdentity>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountRecord {
    uid: String,
    email: String,
    password_hash: String,
    created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FederatedLink {
    uid: String,
    provider: String,
    subject: String,
    email: String,
}

/// Identity provider that keeps accounts in the app's own document store.
///
/// Passwords are stored as argon2 PHC strings. Federated sign-in is only
/// available when a `TokenVerifier` is configured. The signed-in identity
/// survives restarts through a session document.
pub struct LocalIdentityProvider {
    store: Arc<dyn DocumentStore>,
    verifier: Option<Arc<dyn TokenVerifier>>,
    current: RwLock<Option<AuthIdentity>>,
}

impl LocalIdentityProvider {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            verifier: None,
            current: RwLock::new(None),
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Reload the identity saved by the last sign-in, if any.
    pub async fn restore_session(&self) -> Result<Option<AuthIdentity>, AuthError> {
        let restored = match self.store.get(SESSIONS, CURRENT_SESSION).await? {
            Some(doc) => Some(serde_json::from_value::<AuthIdentity>(doc).map_err(StoreError::from)?),
            None => None,
        };
        if let Some(identity) = &restored {
            log::info!("restored session for {}", identity.uid);
        }
        self.set_current(restored.clone());
        Ok(restored)
    }

    async fn start_session(&self, identity: AuthIdentity) -> Result<AuthIdentity, AuthError> {
        let doc = serde_json::to_value(&identity).map_err(StoreError::from)?;
        self.store.set(SESSIONS, CURRENT_SESSION, doc).await?;
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    fn set_current(&self, identity: Option<AuthIdentity>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = identity;
    }

    async fn find_account(&self, email: &str) -> Result<Option<AccountRecord>, AuthError> {
        match self.store.get(ACCOUNTS, email).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc).map_err(StoreError::from)?)),
            None => Ok(None),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn new_uid() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Hashing(e.to_string()))?
}

async fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let (password, stored_hash) = (password.to_string(), stored_hash.to_string());
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| AuthError::Hashing(e.to_string()))?
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError> {
        let email = normalize_email(email);
        if self.find_account(&email).await?.is_some() {
            return Err(AuthError::EmailInUse);
        }

        let record = AccountRecord {
            uid: new_uid(),
            email: email.clone(),
            password_hash: hash_password(password).await?,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        let doc = serde_json::to_value(&record).map_err(StoreError::from)?;
        self.store.set(ACCOUNTS, &email, doc).await?;
        log::info!("created account {}", record.uid);

        self.start_session(AuthIdentity {
            uid: record.uid,
            email,
            display_name: None,
        })
        .await
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, AuthError> {
        let email = normalize_email(email);
        let account = self
            .find_account(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash).await? {
            log::warn!("password sign-in rejected for {}", account.uid);
            return Err(AuthError::InvalidCredentials);
        }

        self.start_session(AuthIdentity {
            uid: account.uid,
            email: account.email,
            display_name: None,
        })
        .await
    }

    async fn sign_in_with_credential(
        &self,
        credential: &FederatedCredential,
    ) -> Result<AuthIdentity, AuthError> {
        let verifier = self.verifier.as_ref().ok_or(AuthError::FederatedUnavailable)?;
        let profile = verifier.verify(credential).await?;
        let key = format!("{}:{}", credential.provider, profile.subject);

        let uid = match self.store.get(FEDERATED, &key).await? {
            Some(doc) => serde_json::from_value::<FederatedLink>(doc)
                .map_err(StoreError::from)?
                .uid,
            None => {
                // Reuse the password account registered with the same email.
                let existing = self.find_account(&normalize_email(&profile.email)).await?;
                let uid = existing.map_or_else(new_uid, |account| account.uid);

                let link = FederatedLink {
                    uid: uid.clone(),
                    provider: credential.provider.clone(),
                    subject: profile.subject.clone(),
                    email: profile.email.clone(),
                };
                let doc = serde_json::to_value(&link).map_err(StoreError::from)?;
                self.store.set(FEDERATED, &key, doc).await?;
                log::info!("linked {} identity to {uid}", credential.provider);
                uid
            }
        };

        self.start_session(AuthIdentity {
            uid,
            email: profile.email,
            display_name: profile.display_name,
        })
        .await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.store.delete(SESSIONS, CURRENT_SESSION).await?;
        self.set_current(None);
        Ok(())
    }

    fn current(&self) -> Option<AuthIdentity> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
