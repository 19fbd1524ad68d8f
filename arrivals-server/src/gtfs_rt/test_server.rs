//! Local vehicle position feed server for client tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

/// Query key used for bounding-box requests.
pub(crate) const BBOX_SCOPE: &str = "bbox";

/// How the server answers one scope.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// 200 with a protobuf body.
    Feed(Vec<u8>),
    /// 200 with an HTML error page.
    Html,
    /// An empty body with this status.
    Status(u16),
    /// Never answers within a test's lifetime.
    Hang,
}

struct FeedServer {
    replies: HashMap<String, Reply>,
    hits: Mutex<Vec<String>>,
}

/// A running server: its base URL and the scopes requested so far.
pub(crate) struct RunningFeed {
    pub(crate) base_url: String,
    server: Arc<FeedServer>,
}

impl RunningFeed {
    /// Scopes requested, in order (`operatorRef` value, or [`BBOX_SCOPE`]).
    pub(crate) fn hits(&self) -> Vec<String> {
        self.server.hits.lock().unwrap().clone()
    }
}

/// Start a server answering `GET /gtfsrtdatafeed/` per scope. Unknown
/// scopes get a 404.
pub(crate) async fn spawn_feed_server<I, K>(replies: I) -> RunningFeed
where
    I: IntoIterator<Item = (K, Reply)>,
    K: Into<String>,
{
    let server = Arc::new(FeedServer {
        replies: replies.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        hits: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/gtfsrtdatafeed/", get(feed))
        .with_state(Arc::clone(&server));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    RunningFeed {
        base_url: format!("http://{addr}"),
        server,
    }
}

async fn feed(
    State(server): State<Arc<FeedServer>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let scope = params
        .get("operatorRef")
        .cloned()
        .unwrap_or_else(|| BBOX_SCOPE.to_string());
    server.hits.lock().unwrap().push(scope.clone());

    match server.replies.get(&scope).cloned() {
        Some(Reply::Feed(bytes)) => (StatusCode::OK, bytes).into_response(),
        Some(Reply::Html) => (
            StatusCode::OK,
            "<html><body>Service Unavailable</body></html>",
        )
            .into_response(),
        Some(Reply::Status(code)) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Some(Reply::Hang) => {
            tokio::time::sleep(Duration::from_secs(600)).await;
            StatusCode::OK.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
