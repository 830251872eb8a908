use super::now_millis;
use super::users::UserRepository;
use crate::backend::{FederatedCredential, IdentityProvider};
use crate::error::ServiceError;
use crate::models::user::{SignUpForm, User};
use crate::validation::format_phone_number;
use std::sync::Arc;

pub struct AuthRepository {
    identity: Arc<dyn IdentityProvider>,
    users: Arc<UserRepository>,
}

impl AuthRepository {
    pub fn new(identity: Arc<dyn IdentityProvider>, users: Arc<UserRepository>) -> Self {
        Self { identity, users }
    }

    pub async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let identity = self.identity.sign_in_with_password(email, password).await?;
        self.users
            .find(&identity.uid)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User data not found".to_string()))
    }

    /// Create the identity, then its profile document. The form arrives
    /// validated and trimmed.
    pub async fn sign_up_with_email(&self, form: &SignUpForm) -> Result<User, ServiceError> {
        let identity = self
            .identity
            .create_account(&form.email, &form.password)
            .await?;

        let user = User {
            id: identity.uid,
            full_name: form.full_name.clone(),
            email: identity.email,
            mobile: format_phone_number(&form.mobile),
            created_at: now_millis(),
            ..User::default()
        };
        self.users.save(&user).await?;
        log::info!("registered user {}", user.id);
        Ok(user)
    }

    /// First federated sign-in creates the profile from the provider's
    /// display name and email; later ones load the stored profile.
    pub async fn sign_in_with_credential(
        &self,
        credential: &FederatedCredential,
    ) -> Result<User, ServiceError> {
        let identity = self.identity.sign_in_with_credential(credential).await?;

        if let Some(existing) = self.users.find(&identity.uid).await? {
            return Ok(existing);
        }

        let user = User {
            id: identity.uid,
            full_name: identity.display_name.unwrap_or_default(),
            email: identity.email,
            mobile: String::new(),
            created_at: now_millis(),
            ..User::default()
        };
        self.users.save(&user).await?;
        log::info!("created profile for federated user {}", user.id);
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<(), ServiceError> {
        self.identity.sign_out().await?;
        Ok(())
    }

    /// Minimal user built from the identity alone, without a document read.
    pub fn current_user(&self) -> Option<User> {
        self.identity.current().map(|identity| User {
            id: identity.uid,
            full_name: identity.display_name.unwrap_or_default(),
            email: identity.email,
            ..User::default()
        })
    }
}
