use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use jobboard_workflow::{
    dto::workflow_dto::ListQuery,
    error::Error,
    middleware::auth::AuthContext,
    models::status::InterviewStatus,
    models::user::ActorRole,
    services::api_service::ApiClient,
    AppState,
};
use serde_json::{json, Value as JsonValue};

struct Backend {
    interview: JsonValue,
    confirms: usize,
    delay: Duration,
}

type Shared = Arc<Mutex<Backend>>;

async fn list_interviews(State(state): State<Shared>) -> Json<JsonValue> {
    Json(json!({ "data": [state.lock().unwrap().interview.clone()] }))
}

async fn confirm(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let delay = state.lock().unwrap().delay;
    tokio::time::sleep(delay).await;
    let mut backend = state.lock().unwrap();
    if backend.interview["_id"] != id.as_str() {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Interview not found" })))
            .into_response();
    }
    backend.confirms += 1;
    backend.interview["candidateConfirmed"] = json!(true);
    Json(json!({ "data": backend.interview })).into_response()
}

async fn serve(delay: Duration) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(Backend {
        interview: json!({
            "_id": "i1",
            "job": { "_id": "job-1", "title": "Backend Engineer" },
            "applicant": "user-1",
            "application": "app-1",
            "status": "Scheduled",
            "interviewDate": "2025-01-10T10:00:00.000Z",
            "candidateConfirmed": false,
            "rescheduleRequested": false
        }),
        confirms: 0,
        delay,
    }));
    let app = Router::new()
        .route("/interviews", get(list_interviews))
        .route("/interviews/:id/confirm", put(confirm))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{}", addr), state)
}

fn jobseeker(base_url: &str) -> AppState {
    let client = ApiClient::new(base_url, AuthContext::anonymous(), Duration::from_secs(5))
        .expect("client");
    AppState::with_api(Arc::new(client), ActorRole::Jobseeker, 20, Duration::from_secs(30))
}

#[tokio::test]
async fn abandoned_confirmation_can_be_retried() {
    let (base_url, backend) = serve(Duration::from_millis(300)).await;
    let board = jobseeker(&base_url).interview_board();
    board.refresh(&ListQuery::default()).await.expect("refresh");

    let abandoned = tokio::time::timeout(Duration::from_millis(50), board.confirm("i1")).await;
    assert!(abandoned.is_err());
    assert!(!board.is_in_flight("i1"));

    backend.lock().unwrap().delay = Duration::ZERO;
    let confirmed = board.confirm("i1").await.expect("retry");
    assert!(confirmed.candidate_confirmed);
    assert_eq!(board.pending_confirmations(), 0);
}

#[tokio::test]
async fn concurrent_confirmations_send_one_request() {
    let (base_url, backend) = serve(Duration::from_millis(200)).await;
    let board = jobseeker(&base_url).interview_board();
    board.refresh(&ListQuery::default()).await.expect("refresh");

    let (first, second) = tokio::join!(board.confirm("i1"), board.confirm("i1"));
    assert!(first.expect("first").candidate_confirmed);
    assert!(matches!(second, Err(Error::Busy(ref id)) if id == "i1"));
    assert!(!board.is_in_flight("i1"));
    assert_eq!(backend.lock().unwrap().confirms, 1);
}

#[tokio::test]
async fn closing_the_board_abandons_a_pending_confirmation() {
    let (base_url, _backend) = serve(Duration::from_millis(300)).await;
    let board = jobseeker(&base_url).interview_board();
    board.refresh(&ListQuery::default()).await.expect("refresh");

    let close = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        board.close();
    };
    let (outcome, _) = tokio::join!(board.confirm("i1"), close);

    assert!(matches!(outcome, Err(Error::Cancelled)));
    assert!(!board.is_in_flight("i1"));
    let local = board.get("i1").expect("row");
    assert!(!local.candidate_confirmed);
    assert!(local.status.is(InterviewStatus::Scheduled));
}
