//! Chat endpoints.
//!
//! - `POST /chat`: `{"message": ".."}` in, `{"answer": ".."}` out
//! - `POST /chat/stream`: same request, answer streamed as SSE `data:` events
//!   followed by a `[DONE]` event

use axum::{
    extract::State,
    response::Json,
    response::sse::{Event as SseEvent, Sse},
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Duration;
use tracing::info;

use concierge_core::StreamFrame;

use crate::SharedState;

/// Sent on the stream endpoint when the message is blank.
pub const EMPTY_MESSAGE_PROMPT: &str = "Please type a question.";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    /// The message with surrounding whitespace removed; missing counts as empty.
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default().trim()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// `POST /chat`: answer a message in one JSON response.
pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let message = payload.text();
    info!(message_len = message.len(), "chat request");

    Json(ChatResponse {
        answer: state.concierge.answer(message),
    })
}

/// `POST /chat/stream`: answer a message as a paced SSE stream.
pub async fn chat_stream_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let message = payload.text();
    info!(message_len = message.len(), "chat stream request");

    let frames = if message.is_empty() {
        vec![
            StreamFrame::Chunk(EMPTY_MESSAGE_PROMPT.into()),
            StreamFrame::Done,
        ]
    } else {
        state.concierge.answer_stream(message)
    };

    Sse::new(paced(frames, state.pace).map(|frame| Ok::<_, Infallible>(to_event(&frame))))
}

/// Yield `frames` in order, waiting `pace` between consecutive frames.
pub fn paced(frames: Vec<StreamFrame>, pace: Duration) -> impl Stream<Item = StreamFrame> {
    futures::stream::iter(frames.into_iter().enumerate()).then(move |(index, frame)| async move {
        if index > 0 && !pace.is_zero() {
            tokio::time::sleep(pace).await;
        }
        frame
    })
}

/// SSE event for a frame. Newlines become separate `data:` lines; carriage
/// returns are not allowed in SSE fields and are dropped.
fn to_event(frame: &StreamFrame) -> SseEvent {
    SseEvent::default().data(frame.as_text().replace('\r', ""))
}
