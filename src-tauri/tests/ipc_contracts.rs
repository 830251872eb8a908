use async_trait::async_trait;
use elektronicare_lib::backend::memory::{InMemoryBlobStore, InMemoryDocumentStore};
use elektronicare_lib::backend::{
    BlobStore, Document, DocumentStore, IdentityProvider, LocalIdentityProvider, Query,
};
use elektronicare_lib::commands::auth::{sign_in_internal, sign_out_internal, sign_up_internal};
use elektronicare_lib::commands::booking::{
    add_booking_images_internal, enter_booking_internal, submit_repair_request_internal,
};
use elektronicare_lib::commands::dashboard::load_dashboard_internal;
use elektronicare_lib::commands::history::{
    cancel_repair_request_internal, list_repair_requests_internal,
};
use elektronicare_lib::commands::launch::{launch_route_internal, LaunchRoute};
use elektronicare_lib::commands::settings::{
    complete_onboarding_internal, get_settings_internal, save_settings_internal,
    support_link_internal,
};
use elektronicare_lib::context::AppContext;
use elektronicare_lib::error::StoreError;
use elektronicare_lib::models::image::ImageSource;
use elektronicare_lib::models::repair_request::{RepairRequestDraft, RepairStatus};
use elektronicare_lib::models::user::SignUpForm;
use elektronicare_lib::repositories::REPAIR_REQUESTS;
use elektronicare_lib::state::UiState;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type CallLog = Arc<Mutex<Vec<String>>>;

/// Records `set` calls on repair requests; everything else passes through.
struct RecordingDocuments {
    inner: InMemoryDocumentStore,
    log: CallLog,
}

#[async_trait]
impl DocumentStore for RecordingDocuments {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        if collection == REPAIR_REQUESTS {
            self.log.lock().unwrap().push(format!("write {collection}"));
        }
        self.inner.set(collection, id, data).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.inner.query(collection, query).await
    }
}

/// Logs each upload by the first payload byte and fails on `fail_on`.
struct RecordingBlobs {
    log: CallLog,
    fail_on: Option<u8>,
}

#[async_trait]
impl BlobStore for RecordingBlobs {
    async fn put(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String, StoreError> {
        let tag = bytes.first().copied().unwrap_or_default();
        self.log.lock().unwrap().push(format!("upload {tag}"));
        if self.fail_on == Some(tag) {
            return Err(StoreError::Storage("connection reset".to_string()));
        }
        Ok(format!("test://{path}"))
    }

    async fn delete(&self, _path: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

struct Harness {
    _tmp: TempDir,
    ctx: Arc<AppContext>,
    log: CallLog,
    documents: Arc<RecordingDocuments>,
}

async fn recording_harness(fail_on: Option<u8>) -> Harness {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let log: CallLog = Arc::default();
    let documents = Arc::new(RecordingDocuments {
        inner: InMemoryDocumentStore::new(),
        log: log.clone(),
    });
    let blobs = Arc::new(RecordingBlobs {
        log: log.clone(),
        fail_on,
    });
    let identity = Arc::new(LocalIdentityProvider::new(documents.clone()));
    identity
        .create_account("pelanggan@example.com", "rahasia1")
        .await
        .expect("create account");

    let ctx = AppContext::with_backends(tmp.path(), identity, documents.clone(), blobs);
    Harness {
        _tmp: tmp,
        ctx: Arc::new(ctx),
        log,
        documents,
    }
}

fn draft() -> RepairRequestDraft {
    RepairRequestDraft {
        service_center_id: "center-1".to_string(),
        device_type: "Laptop".to_string(),
        device_model: "Asus VivoBook 14".to_string(),
        issue: "Does not power on after a spill".to_string(),
        scheduled_date: 1_718_236_800_000,
        scheduled_time: "14:00".to_string(),
    }
}

fn signup_form(email: &str) -> SignUpForm {
    SignUpForm {
        full_name: "Agus Pratama".to_string(),
        mobile: "+6281311112222".to_string(),
        email: email.to_string(),
        password: "rahasia1".to_string(),
    }
}

#[tokio::test]
async fn uploads_happen_in_selection_order_before_the_request_is_written() {
    let h = recording_harness(None).await;
    enter_booking_internal(&h.ctx);
    add_booking_images_internal(
        &h.ctx,
        vec![
            ImageSource::Bytes(vec![1]),
            ImageSource::Bytes(vec![2]),
            ImageSource::Bytes(vec![3]),
        ],
    );

    let request = submit_repair_request_internal(h.ctx.clone(), draft())
        .await
        .expect("submit");

    assert_eq!(
        *h.log.lock().unwrap(),
        vec!["upload 1", "upload 2", "upload 3", "write repair_requests"]
    );
    assert_eq!(request.images.len(), 3);
    assert!(request.images.iter().all(|url| url.starts_with("test://repair_images/")));
    assert_eq!(request.status, RepairStatus::Pending);
    assert!(h.ctx.booking.selected_images().is_empty());
    assert_eq!(h.ctx.booking.state().current(), UiState::Success(request));
}

#[tokio::test]
async fn blank_issue_is_rejected_before_any_backend_call() {
    let h = recording_harness(None).await;
    add_booking_images_internal(&h.ctx, vec![ImageSource::Bytes(vec![1])]);

    let err = submit_repair_request_internal(
        h.ctx.clone(),
        RepairRequestDraft {
            issue: "  ".to_string(),
            ..draft()
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err, "Please describe the issue");
    assert!(h.log.lock().unwrap().is_empty());
    assert_eq!(h.ctx.booking.state().current(), UiState::Idle);

    let err = submit_repair_request_internal(
        h.ctx.clone(),
        RepairRequestDraft {
            scheduled_date: 0,
            ..draft()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, "Please select a date");
    assert!(h.log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_upload_writes_nothing_and_publishes_error() {
    let h = recording_harness(Some(2)).await;
    add_booking_images_internal(
        &h.ctx,
        vec![
            ImageSource::Bytes(vec![1]),
            ImageSource::Bytes(vec![2]),
            ImageSource::Bytes(vec![3]),
        ],
    );

    let err = submit_repair_request_internal(h.ctx.clone(), draft())
        .await
        .unwrap_err();

    assert!(err.starts_with("Image upload failed"));
    assert_eq!(*h.log.lock().unwrap(), vec!["upload 1", "upload 2"]);
    assert_eq!(h.documents.inner.len(REPAIR_REQUESTS), 0);
    assert_eq!(h.ctx.booking.state().current(), UiState::Error(err));
    assert_eq!(h.ctx.booking.selected_images().len(), 3);
}

#[tokio::test]
async fn reentering_booking_resets_to_idle() {
    let h = recording_harness(Some(1)).await;
    add_booking_images_internal(&h.ctx, vec![ImageSource::Bytes(vec![1])]);
    submit_repair_request_internal(h.ctx.clone(), draft())
        .await
        .unwrap_err();
    assert!(h.ctx.booking.state().current().error().is_some());

    let state = enter_booking_internal(&h.ctx);

    assert_eq!(state, UiState::Idle);
    assert!(h.ctx.booking.selected_images().is_empty());
}

#[tokio::test]
async fn signed_out_submission_reports_not_authenticated() {
    let h = recording_harness(None).await;
    sign_out_internal(&h.ctx).await.expect("sign out");

    let err = submit_repair_request_internal(h.ctx.clone(), draft())
        .await
        .unwrap_err();

    assert_eq!(err, "User not authenticated");
    assert!(h.log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn local_backends_persist_requests_images_and_session() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let photo = tmp.path().join("cracked-screen.png");
    std::fs::write(&photo, [0x89, b'P', b'N', b'G']).expect("write photo");

    let ctx = Arc::new(AppContext::open(tmp.path()).await.expect("open context"));
    let user = sign_up_internal(&ctx, &signup_form("agus@example.com"))
        .await
        .expect("sign up");
    assert_eq!(user.mobile, "081311112222");

    add_booking_images_internal(&ctx, vec![ImageSource::File(photo)]);
    let request = submit_repair_request_internal(ctx.clone(), draft())
        .await
        .expect("submit");

    let url = &request.images[0];
    assert!(url.starts_with("file://"));
    assert!(url.ends_with(".png"));
    let stored = url.trim_start_matches("file://");
    assert_eq!(std::fs::read(stored).expect("uploaded file"), vec![0x89, b'P', b'N', b'G']);
    drop(ctx);

    let reopened = AppContext::open(tmp.path()).await.expect("reopen context");
    assert_eq!(
        reopened.auth.current_user().map(|u| u.id),
        Some(user.id.clone())
    );
    let listed = list_repair_requests_internal(&reopened).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, request.id);
    assert_eq!(listed[0].user_id, user.id);
}

#[tokio::test]
async fn listing_is_owner_scoped_and_cancel_updates_status() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let documents = Arc::new(InMemoryDocumentStore::new());
    let identity = Arc::new(LocalIdentityProvider::new(documents.clone()));
    let ctx = Arc::new(AppContext::with_backends(
        tmp.path(),
        identity,
        documents,
        Arc::new(InMemoryBlobStore::new()),
    ));

    sign_up_internal(&ctx, &signup_form("first@example.com")).await.unwrap();
    let first = submit_repair_request_internal(ctx.clone(), draft()).await.unwrap();
    sign_out_internal(&ctx).await.unwrap();

    sign_up_internal(&ctx, &signup_form("second@example.com")).await.unwrap();
    submit_repair_request_internal(ctx.clone(), draft()).await.unwrap();
    submit_repair_request_internal(ctx.clone(), draft()).await.unwrap();
    assert_eq!(list_repair_requests_internal(&ctx).await.unwrap().len(), 2);
    sign_out_internal(&ctx).await.unwrap();

    sign_in_internal(&ctx, "first@example.com", "rahasia1").await.unwrap();
    let mine = list_repair_requests_internal(&ctx).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, first.id);

    let after = cancel_repair_request_internal(&ctx, &first.id).await.unwrap();
    assert_eq!(after[0].status, RepairStatus::Cancelled);
    assert!(after[0].cancelled_at.is_some());

    let missing = cancel_repair_request_internal(&ctx, "no-such-request")
        .await
        .unwrap_err();
    assert_eq!(missing, "Cancel error: Repair request not found");
}

#[tokio::test]
async fn dashboard_limits_recent_requests_from_settings() {
    let h = recording_harness(None).await;
    let uid = h.ctx.auth.current_user().expect("signed in").id;
    h.documents
        .set("users", &uid, json!({ "fullName": "Pelanggan", "email": "pelanggan@example.com" }))
        .await
        .unwrap();
    for _ in 0..3 {
        submit_repair_request_internal(h.ctx.clone(), draft()).await.unwrap();
    }

    save_settings_internal(&h.ctx, json!({ "recentRepairsLimit": 2 })).unwrap();
    let dashboard = load_dashboard_internal(&h.ctx).await.expect("dashboard");

    assert_eq!(dashboard.user.full_name, "Pelanggan");
    assert_eq!(dashboard.recent_repairs.len(), 2);
}

#[tokio::test]
async fn settings_round_trip_and_drive_launch_route() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let documents = Arc::new(InMemoryDocumentStore::new());
    let identity = Arc::new(LocalIdentityProvider::new(documents.clone()));
    let ctx = AppContext::with_backends(
        tmp.path(),
        identity.clone(),
        documents,
        Arc::new(InMemoryBlobStore::new()),
    );

    let initial = get_settings_internal(&ctx).expect("load settings");
    assert_eq!(initial["isFirstLaunch"], json!(true));
    assert_eq!(launch_route_internal(&ctx).unwrap(), LaunchRoute::Onboarding);

    let saved = save_settings_internal(
        &ctx,
        json!({ "supportWhatsapp": "0811-2222-3333", "recentRepairsLimit": 0 }),
    )
    .expect("save settings");
    assert_eq!(saved["supportWhatsapp"], json!("6281122223333"));
    assert_eq!(saved["recentRepairsLimit"], json!(1));
    assert_eq!(saved["supportMessage"], initial["supportMessage"]);
    assert!(support_link_internal(&ctx)
        .unwrap()
        .starts_with("https://wa.me/6281122223333?text=Hi%2C%20"));

    complete_onboarding_internal(&ctx).expect("complete onboarding");
    assert_eq!(launch_route_internal(&ctx).unwrap(), LaunchRoute::Welcome);

    identity.create_account("x@example.com", "rahasia1").await.unwrap();
    assert_eq!(launch_route_internal(&ctx).unwrap(), LaunchRoute::Dashboard);
}
