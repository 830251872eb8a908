use super::{StatePublisher, UiState};
use crate::backend::FederatedCredential;
use crate::error::ServiceError;
use crate::models::user::{SignUpForm, User};
use crate::repositories::auth::AuthRepository;
use crate::validation::{validate_login, validate_registration};
use std::sync::Arc;

pub type AuthState = UiState<User>;

/// Login and registration screens share one state: the user they end with.
pub struct AuthSession {
    auth: Arc<AuthRepository>,
    state: StatePublisher<AuthState>,
}

impl AuthSession {
    pub fn new(auth: Arc<AuthRepository>) -> Self {
        Self {
            auth,
            state: StatePublisher::default(),
        }
    }

    pub fn state(&self) -> &StatePublisher<AuthState> {
        &self.state
    }

    pub fn current_user(&self) -> Option<User> {
        self.auth.current_user()
    }

    /// Inputs are trimmed here, and the trimmed values are what gets
    /// validated, hashed and compared.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let (email, password) = (email.trim(), password.trim());
        validate_login(email, password)?;
        self.run(self.auth.sign_in_with_email(email, password)).await
    }

    pub async fn sign_up(&self, form: &SignUpForm) -> Result<User, ServiceError> {
        let form = trimmed(form);
        validate_registration(&form)?;
        self.run(self.auth.sign_up_with_email(&form)).await
    }

    pub async fn sign_in_with_credential(
        &self,
        credential: &FederatedCredential,
    ) -> Result<User, ServiceError> {
        self.run(self.auth.sign_in_with_credential(credential)).await
    }

    pub async fn sign_out(&self) -> Result<(), ServiceError> {
        self.auth.sign_out().await?;
        self.state.publish(UiState::Idle);
        Ok(())
    }

    async fn run(
        &self,
        action: impl std::future::Future<Output = Result<User, ServiceError>>,
    ) -> Result<User, ServiceError> {
        if !self.state.begin() {
            return Err(ServiceError::Busy);
        }
        match action.await {
            Ok(user) => {
                self.state.publish(UiState::Success(user.clone()));
                Ok(user)
            }
            Err(e) => {
                log::warn!("authentication failed: {e}");
                self.state.publish(UiState::Error(e.to_string()));
                Err(e)
            }
        }
    }
}

fn trimmed(form: &SignUpForm) -> SignUpForm {
    SignUpForm {
        full_name: form.full_name.trim().to_string(),
        mobile: form.mobile.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password.trim().to_string(),
    }
}
