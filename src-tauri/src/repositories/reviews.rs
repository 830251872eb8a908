use super::{decode_all, encode, now_millis, REVIEWS};
use crate::backend::{Direction, DocumentStore, IdentityProvider, Query};
use crate::error::ServiceError;
use crate::models::review::{Review, ReviewDraft};
use crate::validation::validate_rating;
use std::sync::Arc;

pub struct ReviewRepository {
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
}

impl ReviewRepository {
    pub fn new(identity: Arc<dyn IdentityProvider>, documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            identity,
            documents,
        }
    }

    pub async fn submit(&self, draft: ReviewDraft) -> Result<Review, ServiceError> {
        validate_rating(draft.rating)?;
        let uid = self
            .identity
            .current()
            .ok_or(ServiceError::NotAuthenticated)?
            .uid;

        let review = Review {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: uid,
            technician_id: draft.technician_id,
            repair_request_id: draft.repair_request_id,
            rating: draft.rating,
            comment: draft.comment.trim().to_string(),
            created_at: now_millis(),
        };
        self.documents.set(REVIEWS, &review.id, encode(&review)?).await?;
        log::info!("review {} posted for technician {}", review.id, review.technician_id);
        Ok(review)
    }

    /// Newest first.
    pub async fn for_technician(&self, technician_id: &str) -> Result<Vec<Review>, ServiceError> {
        let query = Query::new()
            .where_eq("technicianId", technician_id)
            .order_by("createdAt", Direction::Descending);
        let docs = self.documents.query(REVIEWS, &query).await?;
        Ok(decode_all(REVIEWS, docs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::InMemoryDocumentStore;
    use crate::backend::LocalIdentityProvider;

    #[tokio::test]
    async fn reviews_are_validated_and_scoped_to_technician() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let identity = Arc::new(LocalIdentityProvider::new(documents.clone()));
        let reviews = ReviewRepository::new(identity.clone(), documents);
        identity.create_account("r@example.com", "secret1").await.unwrap();

        let bad = reviews
            .submit(ReviewDraft {
                technician_id: "t1".to_string(),
                rating: 6.0,
                ..ReviewDraft::default()
            })
            .await;
        assert_eq!(bad.unwrap_err().to_string(), "Rating must be between 1 and 5");

        reviews
            .submit(ReviewDraft {
                technician_id: "t1".to_string(),
                repair_request_id: "r1".to_string(),
                rating: 5.0,
                comment: " Fast and tidy ".to_string(),
            })
            .await
            .unwrap();
        reviews
            .submit(ReviewDraft {
                technician_id: "t2".to_string(),
                rating: 3.0,
                ..ReviewDraft::default()
            })
            .await
            .unwrap();

        let for_t1 = reviews.for_technician("t1").await.unwrap();
        assert_eq!(for_t1.len(), 1);
        assert_eq!(for_t1[0].comment, "Fast and tidy");
    }
}
