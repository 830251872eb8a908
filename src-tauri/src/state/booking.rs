use super::{StatePublisher, UiState};
use crate::error::ServiceError;
use crate::models::image::ImageSource;
use crate::models::repair_request::{RepairRequest, RepairRequestDraft};
use crate::repositories::repair_requests::RepairRequestRepository;
use crate::validation::validate_booking;
use std::sync::{Arc, Mutex, PoisonError};

pub type SubmissionState = UiState<RepairRequest>;

/// The booking screen: picked images plus the submission state.
pub struct BookingSession {
    repairs: Arc<RepairRequestRepository>,
    images: Mutex<Vec<ImageSource>>,
    state: StatePublisher<SubmissionState>,
}

impl BookingSession {
    pub fn new(repairs: Arc<RepairRequestRepository>) -> Self {
        Self {
            repairs,
            images: Mutex::new(Vec::new()),
            state: StatePublisher::default(),
        }
    }

    /// Called when the screen is opened. A submission still in flight keeps
    /// its `Loading` state so its outcome is not lost.
    pub fn enter(&self) {
        let reset = self.state.transition(|state| {
            if state.is_loading() {
                false
            } else {
                *state = UiState::Idle;
                true
            }
        });
        if reset {
            self.images().clear();
        }
    }

    pub fn add_image(&self, image: ImageSource) -> usize {
        let mut images = self.images();
        images.push(image);
        images.len()
    }

    /// Drop the image at `index`; out-of-range indices are ignored.
    pub fn remove_image(&self, index: usize) -> usize {
        let mut images = self.images();
        if index < images.len() {
            images.remove(index);
        }
        images.len()
    }

    pub fn selected_images(&self) -> Vec<ImageSource> {
        self.images().clone()
    }

    pub fn state(&self) -> &StatePublisher<SubmissionState> {
        &self.state
    }

    /// Validate, then upload the selected images and write the request.
    ///
    /// Validation failures are returned without touching the published
    /// state. Everything after that is reported through the state as well.
    pub async fn submit(&self, draft: RepairRequestDraft) -> Result<RepairRequest, ServiceError> {
        validate_booking(&draft)?;
        if !self.state.begin() {
            return Err(ServiceError::Busy);
        }

        let images = self.selected_images();
        match self.repairs.create(draft, &images).await {
            Ok(request) => {
                self.images().clear();
                self.state.publish(UiState::Success(request.clone()));
                Ok(request)
            }
            Err(e) => {
                log::warn!("repair request submission failed: {e}");
                self.state.publish(UiState::Error(e.to_string()));
                Err(e)
            }
        }
    }

    fn images(&self) -> std::sync::MutexGuard<'_, Vec<ImageSource>> {
        self.images.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
