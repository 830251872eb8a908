use super::{decode, encode, now_millis, PROFILE_IMAGES, USERS};
use crate::backend::{blob_path, BlobStore, DocumentStore, IdentityProvider};
use crate::error::ServiceError;
use crate::models::image::ImageSource;
use crate::models::user::{ProfileUpdate, User};
use crate::validation::format_phone_number;
use serde_json::{json, Map};
use std::sync::Arc;

pub struct UserRepository {
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl UserRepository {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            identity,
            documents,
            blobs,
        }
    }

    pub async fn find(&self, uid: &str) -> Result<Option<User>, ServiceError> {
        match self.documents.get(USERS, uid).await? {
            Some(data) => Ok(Some(decode(uid, data)?)),
            None => Ok(None),
        }
    }

    pub async fn save(&self, user: &User) -> Result<(), ServiceError> {
        self.documents.set(USERS, &user.id, encode(user)?).await?;
        Ok(())
    }

    /// Profile document of the signed-in user.
    pub async fn current(&self) -> Result<User, ServiceError> {
        let uid = self
            .identity
            .current()
            .ok_or(ServiceError::NotAuthenticated)?
            .uid;
        self.find(&uid)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Apply the edited fields, uploading `image` first when one was picked,
    /// and return the stored profile.
    pub async fn update_profile(
        &self,
        update: ProfileUpdate,
        image: Option<&ImageSource>,
    ) -> Result<User, ServiceError> {
        let uid = self
            .identity
            .current()
            .ok_or(ServiceError::NotAuthenticated)?
            .uid;

        let image_url = match image {
            Some(image) => Some(self.upload_profile_image(&uid, image).await?),
            None => None,
        };

        let mut fields = Map::new();
        fields.insert("fullName".to_string(), json!(update.full_name.trim()));
        let mobile = if update.mobile.trim().is_empty() {
            String::new()
        } else {
            format_phone_number(&update.mobile)
        };
        fields.insert("mobile".to_string(), json!(mobile));
        fields.insert("address".to_string(), json!(update.address));
        fields.insert("city".to_string(), json!(update.city));
        fields.insert("updatedAt".to_string(), json!(now_millis()));
        if let Some(url) = image_url {
            fields.insert("profileImage".to_string(), json!(url));
        }

        self.documents
            .update(USERS, &uid, fields)
            .await
            .map_err(|e| ServiceError::not_found_as(e, "User not found"))?;
        log::info!("profile {uid} updated");

        self.current().await
    }

    async fn upload_profile_image(&self, uid: &str, image: &ImageSource) -> Result<String, ServiceError> {
        let bytes = image.read().await?;
        let path = blob_path(PROFILE_IMAGES, uid, image.extension());
        self.blobs
            .put(&path, bytes, image.content_type())
            .await
            .map_err(ServiceError::Upload)
    }
}
