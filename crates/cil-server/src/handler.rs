use std::convert::Infallible;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use cil_crypto::BlockHasher;
use cil_fabric::{EventFilter, EventKind, EventPayload};
use cil_ledger::{list_from, Block, ChainAudit, ChainVerifier, ChainWriter, SortOrder};
use cil_types::{ReportPayload, ReportSubmission, SubmitterRef};

use crate::error::ServerResult;
use crate::state::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "cil-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Query parameters for chain listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub min_index: u64,
    #[serde(default)]
    pub order: SortOrder,
}

/// `GET /chain` — list blocks, optionally filtered and sorted.
///
/// An empty page is a 200 with an empty list: "no blocks above the
/// threshold" is an ordinary answer, not an error.
pub async fn list_chain(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ServerResult<Json<Vec<Block>>> {
    let blocks = list_from(&*state.chain, params.min_index, params.order)?;
    Ok(Json(blocks))
}

/// `GET /chain/blocks/:index` — a single block.
pub async fn get_block(
    State(state): State<AppState>,
    Path(index): Path<u64>,
) -> ServerResult<Json<Block>> {
    use cil_ledger::ChainReader;
    Ok(Json(state.chain.get(index)?))
}

/// `GET /chain/verify` — audit the chain and report findings as data.
///
/// A broken chain is a 200 with findings, never an HTTP failure: callers
/// must be able to distinguish "cannot reach the chain" from "the chain is
/// provably tampered".
pub async fn verify_chain(State(state): State<AppState>) -> ServerResult<Json<ChainAudit>> {
    let audit = ChainVerifier::audit(&*state.chain)?;
    state
        .fabric
        .publish_audit(audit.blocks_checked, audit.findings.len() as u64);
    Ok(Json(audit))
}

/// `POST /report` — accept a report submission and append it.
///
/// The handler computes the content digest from the submitted text and
/// attachment identifiers; the chain core never hashes media itself.
pub async fn submit_report(
    State(state): State<AppState>,
    Json(submission): Json<ReportSubmission>,
) -> ServerResult<(StatusCode, Json<Block>)> {
    let submitter = submission
        .user_id
        .as_deref()
        .map(SubmitterRef::new)
        .unwrap_or_else(SubmitterRef::anonymous);
    let content_digest = BlockHasher::report_digest(&submission.text, &submission.media_links);

    let payload = ReportPayload::new(
        submitter,
        content_digest,
        submission.media_links,
        submission.text,
    );

    let block = state.chain.append(payload)?;
    info!(index = block.index, hash = %block.hash.short_hex(), "report appended");

    // Published only after the durable append: subscribers never see a
    // block that failed to commit.
    state.fabric.publish_block_appended(block.clone());

    Ok((StatusCode::CREATED, Json(block)))
}

/// `GET /chain/events` — server-sent stream of appended blocks.
pub async fn chain_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.fabric.subscribe(EventFilter {
        kinds: Some(vec![EventKind::BlockAppended]),
        min_index: None,
    });

    let stream = BroadcastStream::new(rx).filter_map(|item| match item {
        Ok(event) => match event.payload {
            EventPayload::Block(block) => Event::default()
                .event("block")
                .json_data(&block)
                .ok()
                .map(Ok),
            EventPayload::Audit { .. } => None,
        },
        // A lagged subscriber skips missed events and resumes live.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
