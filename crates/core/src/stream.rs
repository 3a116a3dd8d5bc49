//! Splitting a finished answer into stream frames.
//!
//! Chunking is pure; pacing between frames belongs to the transport.

/// Default chunk length, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 80;

/// Wire marker sent after the last chunk.
pub const END_MARKER: &str = "[DONE]";

/// One unit of a streamed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    Chunk(String),
    Done,
}

impl StreamFrame {
    /// Text carried on the wire for this frame.
    pub fn as_text(&self) -> &str {
        match self {
            StreamFrame::Chunk(text) => text,
            StreamFrame::Done => END_MARKER,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, StreamFrame::Done)
    }
}

/// Split `answer` into consecutive slices of at most `chunk_size` characters.
///
/// Slices never split a code point. An empty answer yields no chunks; a
/// `chunk_size` of zero yields the whole answer as one chunk.
pub fn chunk_answer(answer: &str, chunk_size: usize) -> Vec<String> {
    if answer.is_empty() {
        return Vec::new();
    }
    if chunk_size == 0 {
        return vec![answer.to_string()];
    }

    let mut chunks = Vec::with_capacity(answer.len() / chunk_size + 1);
    let mut start = 0;
    for (count, (idx, _)) in answer.char_indices().enumerate() {
        if count > 0 && count % chunk_size == 0 {
            chunks.push(answer[start..idx].to_string());
            start = idx;
        }
    }
    chunks.push(answer[start..].to_string());
    chunks
}

/// Chunk frames for `answer` followed by a single [`StreamFrame::Done`].
pub fn stream_frames(answer: &str, chunk_size: usize) -> Vec<StreamFrame> {
    chunk_answer(answer, chunk_size)
        .into_iter()
        .map(StreamFrame::Chunk)
        .chain(std::iter::once(StreamFrame::Done))
        .collect()
}

/// Concatenate the chunk frames, ignoring the end marker.
pub fn reassemble(frames: &[StreamFrame]) -> String {
    frames
        .iter()
        .filter_map(|f| match f {
            StreamFrame::Chunk(text) => Some(text.as_str()),
            StreamFrame::Done => None,
        })
        .collect()
}
