//! Client against a live in-process server.

use std::sync::Arc;

use axum::Router;
use tradedesk_client::{NoAuth, ResourceClient, Session};
use tradedesk_core::{Module, ServiceError};
use tradedesk_identity::{gate, hash_password, IdentityConfig, IdentityModule, UserEntry};
use tradedesk_kv::{KVStore, RedbStore};
use tradedesk_masters::model::{Transport, Unit};
use tradedesk_masters::MastersModule;
use tradedesk_records::{Collection, FormCollector, RecordBrowser, RecordError};

struct TestServer {
    base_url: String,
    _dir: tempfile::TempDir,
}

async fn start_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&dir.path().join("server.redb")).unwrap());

    let identity = IdentityModule::new(IdentityConfig {
        users: vec![UserEntry {
            email: "owner@tradedesk.in".into(),
            name: "Owner".into(),
            password_hash: hash_password("open-sesame").unwrap(),
        }],
        jwt_secret: "integration-secret".into(),
        expire_secs: 3600,
    });
    let masters = MastersModule::new(kv);

    let app = Router::new()
        .nest("/auth", identity.routes())
        .nest("/masters", masters.routes())
        .layer(axum::middleware::from_fn_with_state(identity.service(), gate));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        _dir: dir,
    }
}

#[tokio::test]
async fn sign_in_and_manage_units() {
    let server = start_server().await;
    let session = Arc::new(Session::new(&server.base_url));
    let mut observer = session.subscribe();

    let user = session.sign_in("owner@tradedesk.in", "open-sesame").await.unwrap();
    assert_eq!(user.name, "Owner");
    observer.changed().await.unwrap();
    assert_eq!(observer.borrow().as_ref().map(|u| u.email.clone()), Some(user.email));

    let units: Arc<dyn Collection<Unit>> =
        Arc::new(ResourceClient::<Unit>::new(&server.base_url, session.clone()));

    let mut form = FormCollector::new(units.clone());
    form.set_field("unit", "Box").unwrap();
    form.submit().await.unwrap();

    let mut browser = RecordBrowser::new(units);
    browser.load().await.unwrap();
    assert_eq!(browser.displayed().len(), 1);
    let id = browser.displayed()[0].id.clone();

    browser.toggle_expand(&id).unwrap();
    browser.edit_field("unit", "Carton").unwrap();
    let stored = browser.save().await.unwrap();
    assert_eq!(stored.unit, "Carton");

    browser.remove(&id).await.unwrap();
    let err = browser.remove(&id).await.unwrap_err();
    assert!(err.is_not_found());

    browser.load().await.unwrap();
    assert!(browser.displayed().is_empty());
}

#[tokio::test]
async fn server_validation_reaches_the_form() {
    let server = start_server().await;
    let session = Arc::new(Session::new(&server.base_url));
    session.sign_in("OWNER@tradedesk.in", "open-sesame").await.unwrap();

    let transports = ResourceClient::<Transport>::new(&server.base_url, session.clone());
    let bad = Transport {
        transport_name: "Speedy Cargo".into(),
        phone_no: "12345".into(),
        ..Default::default()
    };
    let err = Collection::create(&transports, bad).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Validation("Invalid phone number. Must be 10 digits.".into())
    );
}

#[tokio::test]
async fn gate_rejects_anonymous_and_bad_passwords() {
    let server = start_server().await;

    let anonymous = ResourceClient::<Unit>::new(&server.base_url, Arc::new(NoAuth));
    let err = Collection::list(&anonymous).await.unwrap_err();
    assert_eq!(err.error_code(), "UNAUTHENTICATED");

    let session = Session::new(&server.base_url);
    assert!(session.sign_in("owner@tradedesk.in", "guess").await.is_err());
    assert!(session.current_user().is_none());

    let signed_out = Arc::new(Session::new(&server.base_url));
    let mut browser = RecordBrowser::new(Arc::new(ResourceClient::<Unit>::new(
        &server.base_url,
        signed_out,
    )) as Arc<dyn Collection<Unit>>);
    let err = browser.load().await.unwrap_err();
    assert!(matches!(err, RecordError::Storage(ServiceError::Unauthorized(_))));
}

#[tokio::test]
async fn restore_reuses_a_token() {
    let server = start_server().await;
    let first = Session::new(&server.base_url);
    first.sign_in("owner@tradedesk.in", "open-sesame").await.unwrap();
    let token = first.access_token().await.unwrap();

    let second = Session::new(&server.base_url);
    let user = second.restore(&token).await.unwrap();
    assert_eq!(user.email, "owner@tradedesk.in");
    assert_eq!(second.current_user(), Some(user));

    assert!(Session::new(&server.base_url).restore("stale").await.is_err());
}
