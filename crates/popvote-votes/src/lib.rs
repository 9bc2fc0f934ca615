#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod gallery;
mod tally;
mod targets;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use indexmap::IndexMap;
use popvote_core::Message;
use popvote_storage::ObjectStore;
use serde::{Deserialize, Serialize};

pub use error::{Result, VoteError};
pub use gallery::IMAGE_PREFIX;
pub use tally::{TALLY_OBJECT, TARGET_PREFIX, TallyCounts, TallyStore};

/// Voting endpoints' shared state
pub struct Server {
    tally: TallyStore,
    store: Arc<dyn ObjectStore>,
}

/// Build the voting server over a storage backend
pub fn build_server(store: Arc<dyn ObjectStore>) -> Arc<Server> {
    Arc::new(Server {
        tally: TallyStore::new(Arc::clone(&store)),
        store,
    })
}

/// Create the endpoint router for voting and image retrieval
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/vote_counter", get(vote_counter))
        .route("/get_vote_counts", get(get_vote_counts))
        .route("/get_vote_targets", get(get_vote_targets))
        .route("/clear_votes", get(clear_votes).post(clear_votes))
        .route("/get_image", get(get_image))
}

#[derive(Debug, Deserialize)]
struct VoteQuery {
    item: Option<String>,
}

#[derive(Debug, Serialize)]
struct VoteOutcome {
    message: String,
    current_counts: TallyCounts,
}

/// Record a vote for an existing target
async fn vote_counter(
    State(server): State<Arc<Server>>,
    Query(query): Query<VoteQuery>,
) -> Result<Json<VoteOutcome>> {
    let item = query
        .item
        .filter(|item| !item.is_empty())
        .ok_or(VoteError::MissingParameter("item"))?;

    let (count, current_counts) = server.tally.record_vote(&item).await?;

    Ok(Json(VoteOutcome {
        message: format!("Voted for \"{item}\". Current count: {count}"),
        current_counts,
    }))
}

/// Return the tally document verbatim
async fn get_vote_counts(State(server): State<Arc<Server>>) -> Result<Json<TallyCounts>> {
    let counts = server.tally.read().await?;
    Ok(Json(counts))
}

/// Return all vote targets mapped to zero
async fn get_vote_targets(State(server): State<Arc<Server>>) -> Result<Json<IndexMap<String, u64>>> {
    let targets = targets::list_targets(server.store.as_ref()).await?;
    Ok(Json(targets))
}

/// Reset the tally document
async fn clear_votes(State(server): State<Arc<Server>>) -> Result<Json<Message>> {
    server.tally.clear().await?;

    tracing::info!("vote tally cleared");

    Ok(Json(Message::new(format!("\"{TALLY_OBJECT}\" has been cleared."))))
}

#[derive(Debug, Deserialize)]
struct ImageQuery {
    image_name: Option<String>,
}

/// Serve an image blob with an inferred content type
async fn get_image(
    State(server): State<Arc<Server>>,
    Query(query): Query<ImageQuery>,
) -> Result<impl IntoResponse> {
    let name = query
        .image_name
        .filter(|name| !name.is_empty())
        .ok_or(VoteError::MissingParameter("image_name"))?;

    let (data, content_type) = gallery::fetch_image(server.store.as_ref(), &name).await?;

    Ok(([(http::header::CONTENT_TYPE, content_type)], data))
}
