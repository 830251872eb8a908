use super::{StatePublisher, UiState};
use crate::error::ServiceError;
use crate::models::image::ImageSource;
use crate::models::user::{ProfileUpdate, User};
use crate::repositories::users::UserRepository;
use crate::validation::validate_profile;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type ProfileState = UiState<User>;

pub struct ProfileSession {
    users: Arc<UserRepository>,
    image: Mutex<Option<ImageSource>>,
    state: StatePublisher<ProfileState>,
}

impl ProfileSession {
    pub fn new(users: Arc<UserRepository>) -> Self {
        Self {
            users,
            image: Mutex::new(None),
            state: StatePublisher::default(),
        }
    }

    pub fn state(&self) -> &StatePublisher<ProfileState> {
        &self.state
    }

    pub async fn load(&self) -> Result<User, ServiceError> {
        if !self.state.begin() {
            return Err(ServiceError::Busy);
        }
        let result = self.users.current().await;
        self.finish(result)
    }

    pub fn select_image(&self, image: ImageSource) {
        *self.image() = Some(image);
    }

    pub fn clear_image(&self) {
        self.image().take();
    }

    pub fn selected_image(&self) -> Option<ImageSource> {
        self.image().clone()
    }

    pub async fn save(&self, update: ProfileUpdate) -> Result<User, ServiceError> {
        validate_profile(&update)?;
        if !self.state.begin() {
            return Err(ServiceError::Busy);
        }

        let image = self.selected_image();
        let result = self.users.update_profile(update, image.as_ref()).await;
        if result.is_ok() {
            self.clear_image();
        }
        self.finish(result)
    }

    fn finish(&self, result: Result<User, ServiceError>) -> Result<User, ServiceError> {
        match &result {
            Ok(user) => self.state.publish(UiState::Success(user.clone())),
            Err(e) => {
                log::warn!("profile operation failed: {e}");
                self.state.publish(UiState::Error(e.to_string()));
            }
        }
        result
    }

    fn image(&self) -> MutexGuard<'_, Option<ImageSource>> {
        self.image.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{InMemoryBlobStore, InMemoryDocumentStore};
    use crate::backend::{IdentityProvider, LocalIdentityProvider};

    #[tokio::test]
    async fn save_uploads_selected_image_then_clears_it() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let blobs = Arc::new(InMemoryBlobStore::new());
        let identity = Arc::new(LocalIdentityProvider::new(documents.clone()));
        let users = Arc::new(UserRepository::new(identity.clone(), documents, blobs.clone()));
        let me = identity.create_account("sari@example.com", "secret1").await.unwrap();
        users
            .save(&User {
                id: me.uid,
                full_name: "Sari".to_string(),
                email: me.email,
                ..User::default()
            })
            .await
            .unwrap();

        let session = ProfileSession::new(users);
        assert_eq!(session.load().await.unwrap().full_name, "Sari");

        session.select_image(ImageSource::Bytes(vec![1, 2, 3]));
        let saved = session
            .save(ProfileUpdate {
                full_name: "Sari Dewi".to_string(),
                city: "Surabaya".to_string(),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap();

        assert!(saved.profile_image.is_some());
        assert!(session.selected_image().is_none());
        assert_eq!(blobs.paths().len(), 1);
        assert_eq!(session.state().current(), UiState::Success(saved));
    }

    #[tokio::test]
    async fn load_signed_out_publishes_error() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let identity = Arc::new(LocalIdentityProvider::new(documents.clone()));
        let users = Arc::new(UserRepository::new(identity, documents, Arc::new(InMemoryBlobStore::new())));
        let session = ProfileSession::new(users);

        assert!(session.load().await.is_err());
        assert_eq!(
            session.state().current(),
            UiState::Error("User not authenticated".to_string())
        );
    }
}
