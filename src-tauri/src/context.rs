use crate::backend::fs_blob::FileBlobStore;
use crate::backend::sqlite::SqliteDocumentStore;
use crate::backend::{BlobStore, DocumentStore, IdentityProvider, LocalIdentityProvider};
use crate::config::settings::{load_effective_settings, EffectiveSettings};
use crate::error::ServiceError;
use crate::repositories::auth::AuthRepository;
use crate::repositories::repair_requests::RepairRequestRepository;
use crate::repositories::reviews::ReviewRepository;
use crate::repositories::service_centers::ServiceCenterRepository;
use crate::repositories::technicians::TechnicianRepository;
use crate::repositories::users::UserRepository;
use crate::state::auth::AuthSession;
use crate::state::booking::BookingSession;
use crate::state::catalog::CatalogSession;
use crate::state::dashboard::DashboardSession;
use crate::state::history::RepairHistorySession;
use crate::state::profile::ProfileSession;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DATABASE_FILE: &str = "elektronicare.db";
const BLOB_DIR: &str = "blobs";

/// Everything the IPC commands need, built once at startup.
pub struct AppContext {
    data_dir: PathBuf,
    pub auth: AuthSession,
    pub booking: BookingSession,
    pub profile: ProfileSession,
    pub dashboard: DashboardSession,
    pub catalog: CatalogSession,
    pub history: RepairHistorySession,
    pub reviews: ReviewRepository,
}

impl AppContext {
    /// Local backends under `data_dir`: SQLite documents, files for blobs,
    /// and the previous session restored if there was one.
    pub async fn open(data_dir: &Path) -> Result<Self, ServiceError> {
        let documents: Arc<dyn DocumentStore> =
            Arc::new(SqliteDocumentStore::open(&data_dir.join(DATABASE_FILE))?);
        let blobs: Arc<dyn BlobStore> = Arc::new(FileBlobStore::new(data_dir.join(BLOB_DIR)));

        let identity = Arc::new(LocalIdentityProvider::new(documents.clone()));
        identity.restore_session().await?;
        log::info!("data directory: {}", data_dir.display());

        Ok(Self::with_backends(data_dir, identity, documents, blobs))
    }

    pub fn with_backends(
        data_dir: &Path,
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let users = Arc::new(UserRepository::new(
            identity.clone(),
            documents.clone(),
            blobs.clone(),
        ));
        let repairs = Arc::new(RepairRequestRepository::new(
            identity.clone(),
            documents.clone(),
            blobs,
        ));
        let auth = Arc::new(AuthRepository::new(identity.clone(), users.clone()));

        Self {
            data_dir: data_dir.to_path_buf(),
            auth: AuthSession::new(auth),
            booking: BookingSession::new(repairs.clone()),
            profile: ProfileSession::new(users.clone()),
            dashboard: DashboardSession::new(users, repairs.clone()),
            catalog: CatalogSession::new(
                Arc::new(ServiceCenterRepository::new(documents.clone())),
                Arc::new(TechnicianRepository::new(documents.clone())),
            ),
            history: RepairHistorySession::new(repairs),
            reviews: ReviewRepository::new(identity, documents),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn settings(&self) -> Result<EffectiveSettings, String> {
        load_effective_settings(&self.data_dir)
    }
}
