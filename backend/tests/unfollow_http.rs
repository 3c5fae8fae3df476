//! End-to-end HTTP tests for the unfollow endpoint over the in-memory store.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{App, test, web};
use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use user_causes::Trace;
use user_causes::domain::{CauseId, TRACE_ID_HEADER, UnfollowCauseService, UserCauseKey, UserId};
use user_causes::inbound::http::auth::TokenVerifier;
use user_causes::inbound::http::state::HttpState;
use user_causes::inbound::http::user_causes::configure;
use user_causes::outbound::memory::{FailurePoint, InMemoryCauseStore, StoreOperation};

const SECRET: &[u8] = b"integration-secret";

#[fixture]
fn store() -> Arc<InMemoryCauseStore> {
    let store = Arc::new(InMemoryCauseStore::new());
    store.insert_cause(cause(), Some(3));
    store.insert_association(UserCauseKey::new(user(), cause()));
    store
}

fn user() -> UserId {
    UserId::new("user123").expect("user id")
}

fn cause() -> CauseId {
    CauseId::new("cause456").expect("cause id")
}

fn bearer(sub: &str) -> String {
    let claims = json!({ "sub": sub, "exp": get_current_timestamp() + 600 });
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET))
        .expect("token encodes");
    format!("Bearer {token}")
}

struct Reply {
    status: StatusCode,
    body: Value,
    trace_id: Option<String>,
}

async fn send(
    store: &Arc<InMemoryCauseStore>,
    uri: &str,
    authorization: Option<String>,
    trace_id: Option<&str>,
) -> Reply {
    let command = UnfollowCauseService::new(Arc::clone(store), Arc::clone(store));
    let state = HttpState::new(
        Arc::new(command),
        Arc::new(TokenVerifier::hs256(SECRET, None, None)),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .configure(configure),
    )
    .await;

    let mut req = test::TestRequest::delete().uri(uri);
    if let Some(value) = authorization {
        req = req.insert_header((AUTHORIZATION, value));
    }
    if let Some(value) = trace_id {
        req = req.insert_header((TRACE_ID_HEADER, value));
    }
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    assert_eq!(
        res.headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
    let trace_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = test::read_body_json(res).await;
    Reply {
        status,
        body,
        trace_id,
    }
}

#[rstest]
#[actix_web::test]
async fn unfollow_removes_association_and_decrements(store: Arc<InMemoryCauseStore>) {
    let reply = send(
        &store,
        "/api/v1/user_causes/cause456",
        Some(bearer("user123")),
        None,
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.body,
        json!({ "message": "cause unfollowed successfully." })
    );
    assert!(!store.has_association(&UserCauseKey::new(user(), cause())));
    assert_eq!(store.stored_follower_count(&cause()), Some(Some(2)));
    assert_eq!(
        store.operations(),
        vec![
            StoreOperation::FindKeys {
                user_id: user(),
                cause_id: cause(),
            },
            StoreOperation::DeleteBatch {
                keys: vec![UserCauseKey::new(user(), cause())],
            },
            StoreOperation::AdjustFollowerCount {
                cause_id: cause(),
                delta: -1,
            },
        ]
    );
}

#[rstest]
#[actix_web::test]
async fn repeated_unfollow_decrements_twice(store: Arc<InMemoryCauseStore>) {
    for _ in 0..2 {
        let reply = send(
            &store,
            "/api/v1/user_causes/cause456",
            Some(bearer("user123")),
            None,
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);
    }

    assert_eq!(store.stored_follower_count(&cause()), Some(Some(1)));
}

#[rstest]
#[actix_web::test]
async fn padded_cause_id_runs_the_cascade(store: Arc<InMemoryCauseStore>) {
    let padded = CauseId::new(" cause456").expect("cause id");
    store.insert_cause(padded.clone(), Some(5));
    store.insert_association(UserCauseKey::new(user(), padded.clone()));

    let reply = send(
        &store,
        "/api/v1/user_causes/%20cause456",
        Some(bearer("user123")),
        None,
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.body,
        json!({ "message": "cause unfollowed successfully." })
    );
    assert!(!store.has_association(&UserCauseKey::new(user(), padded.clone())));
    assert_eq!(store.stored_follower_count(&padded), Some(Some(4)));
    assert_eq!(store.stored_follower_count(&cause()), Some(Some(3)));
}

#[rstest]
#[actix_web::test]
async fn query_failure_reports_unexpected_error_without_writes(
    store: Arc<InMemoryCauseStore>,
) {
    store.fail_on(FailurePoint::FindKeys);

    let reply = send(
        &store,
        "/api/v1/user_causes/cause456",
        Some(bearer("user123")),
        None,
    )
    .await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = reply.body["error"].as_str().expect("error field");
    assert!(message.starts_with("Unexpected server error: "));
    assert_eq!(
        store.operations(),
        vec![StoreOperation::FindKeys {
            user_id: user(),
            cause_id: cause(),
        }]
    );
    assert!(store.has_association(&UserCauseKey::new(user(), cause())));
    assert_eq!(store.stored_follower_count(&cause()), Some(Some(3)));
}

#[rstest]
#[case("/api/v1/user_causes")]
#[case("/api/v1/user_causes/")]
#[actix_web::test]
async fn missing_cause_id_touches_no_store(store: Arc<InMemoryCauseStore>, #[case] uri: &str) {
    let reply = send(&store, uri, Some(bearer("user123")), None).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body,
        json!({
            "status": 400,
            "message": "sorry, there was an error processing your request",
            "detail": "cause_id not present",
        })
    );
    assert!(store.operations().is_empty());
}

#[rstest]
#[case(None)]
#[case(Some("Basic dXNlcjpwYXNz".to_owned()))]
#[case(Some("Bearer garbage".to_owned()))]
#[actix_web::test]
async fn unauthenticated_request_touches_no_store(
    store: Arc<InMemoryCauseStore>,
    #[case] authorization: Option<String>,
) {
    let reply = send(&store, "/api/v1/user_causes/cause456", authorization, None).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body, json!({ "message": "Unauthorized" }));
    assert!(store.operations().is_empty());
    assert_eq!(store.stored_follower_count(&cause()), Some(Some(3)));
}

#[rstest]
#[actix_web::test]
async fn unknown_cause_reports_unexpected_error_after_removal(
    store: Arc<InMemoryCauseStore>,
) {
    store.insert_association(UserCauseKey::new(
        user(),
        CauseId::new("ghost").expect("cause id"),
    ));

    let reply = send(
        &store,
        "/api/v1/user_causes/ghost",
        Some(bearer("user123")),
        None,
    )
    .await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = reply.body["error"].as_str().expect("error field");
    assert!(message.starts_with("Unexpected server error: "));
    assert!(!store.has_association(&UserCauseKey::new(
        user(),
        CauseId::new("ghost").expect("cause id"),
    )));
}

#[rstest]
#[actix_web::test]
async fn inbound_trace_id_is_echoed(store: Arc<InMemoryCauseStore>) {
    let trace_id = "00000000-0000-4000-8000-000000000001";

    let reply = send(
        &store,
        "/api/v1/user_causes/cause456",
        None,
        Some(trace_id),
    )
    .await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.trace_id.as_deref(), Some(trace_id));
}
