//! HTTP shell around the application model.
//!
//! The browser page posts [`Event`]s and re-renders from the returned [`View`]. When
//! an event leaves a reply owed, the page opens `/api/respond`, an SSE stream of
//! `partial` placeholder renders followed by one `settled` view.

use crate::app::{update, view, App, Command, Event, View};
use crate::llm::client::LlmClient;
use crate::session::exchange::ExchangeEvent;
use crate::store::ConversationStore;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info};

const INDEX_HTML: &str = include_str!("index.html");

/// Everything a request handler needs: the one session plus its collaborators.
pub struct AppContext {
    app: Mutex<App>,
    client: LlmClient,
    store: ConversationStore,
}

impl AppContext {
    pub fn new(app: App, client: LlmClient, store: ConversationStore) -> Arc<Self> {
        Arc::new(Self {
            app: Mutex::new(app),
            client,
            store,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub view: View,
    /// The page should open `/api/respond` next.
    pub respond: bool,
}

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/view", get(current_view))
        .route("/api/event", post(apply_event))
        .route("/api/upload", post(upload))
        .route("/api/respond", get(respond))
        .route("/health", get(|| async { "ok" }))
        .with_state(ctx)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn current_view(State(ctx): State<Arc<AppContext>>) -> Json<View> {
    let app = ctx.app.lock().await;
    Json(view(&app))
}

async fn apply_event(
    State(ctx): State<Arc<AppContext>>,
    Json(event): Json<Event>,
) -> Json<EventResponse> {
    dispatch(&ctx, event).await
}

/// Raw upload body; an empty body counts as no file.
async fn upload(State(ctx): State<Arc<AppContext>>, body: Bytes) -> Json<EventResponse> {
    let bytes = (!body.is_empty()).then(|| body.to_vec());
    debug!(size = body.len(), "Conversation upload received");
    dispatch(&ctx, Event::UploadConversations { bytes }).await
}

async fn dispatch(ctx: &AppContext, event: Event) -> Json<EventResponse> {
    let mut app = ctx.app.lock().await;
    let command = update(&mut app, event, &ctx.store);
    Json(EventResponse {
        view: view(&app),
        respond: command == Command::RequestResponse,
    })
}

async fn respond(
    State(ctx): State<Arc<AppContext>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<SseEvent>();

    tokio::spawn(async move {
        let mut app = ctx.app.lock().await;
        let partial_tx = tx.clone();

        let outcome = app
            .respond(&ctx.client, move |event| {
                if let ExchangeEvent::Partial(text) = event {
                    match SseEvent::default().event("partial").json_data(&text) {
                        Ok(sse) => {
                            let _ = partial_tx.send(sse);
                        }
                        Err(e) => error!(error = %e, "Failed to encode partial response"),
                    }
                }
            })
            .await;

        if let Some(outcome) = outcome {
            info!(progress = outcome.progress, "Response streamed to page");
        }

        match SseEvent::default().event("settled").json_data(view(&app)) {
            Ok(sse) => {
                let _ = tx.send(sse);
            }
            Err(e) => error!(error = %e, "Failed to encode settled view"),
        }
    });

    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            yield Ok(event);
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Bind and serve until the process is stopped.
pub async fn serve(ctx: Arc<AppContext>, bind: std::net::SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "Study assistant listening");
    axum::serve(listener, router(ctx)).await
}
