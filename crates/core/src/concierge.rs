//! The answer-serving path: cache lookup, answer building, stream framing.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::answer::AnswerBuilder;
use crate::cache::ResponseCache;
use crate::stream::{DEFAULT_CHUNK_SIZE, StreamFrame, stream_frames};

/// Counters describing how queries were served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConciergeStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub answers_computed: u64,
    pub cached_entries: usize,
}

/// Answers guest queries, consulting the response cache first.
///
/// Safe to share behind an `Arc` across request handlers.
#[derive(Debug)]
pub struct Concierge {
    builder: AnswerBuilder,
    cache: Option<ResponseCache>,
    chunk_size: usize,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    answers_computed: AtomicU64,
}

impl Concierge {
    pub fn new(builder: AnswerBuilder, cache: ResponseCache) -> Self {
        Self::assemble(builder, Some(cache))
    }

    /// A concierge that recomputes every answer.
    pub fn uncached(builder: AnswerBuilder) -> Self {
        Self::assemble(builder, None)
    }

    fn assemble(builder: AnswerBuilder, cache: Option<ResponseCache>) -> Self {
        Self {
            builder,
            cache,
            chunk_size: DEFAULT_CHUNK_SIZE,
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            answers_computed: AtomicU64::new(0),
        }
    }

    /// Set the stream chunk length in characters (zero means one chunk).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn builder(&self) -> &AnswerBuilder {
        &self.builder
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Answer a query. Never fails.
    pub fn answer(&self, query: &str) -> String {
        let key = query.to_lowercase();

        let Some(cache) = &self.cache else {
            return self.compute(query);
        };

        if let Some(hit) = cache.get(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key_len = key.len(), "Cache hit");
            return hit;
        }

        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key_len = key.len(), "Cache miss");
        let answer = self.compute(query);
        cache.set(&key, &answer);
        answer
    }

    /// The same answer as [`Concierge::answer`], re-chunked for streaming.
    pub fn answer_stream(&self, query: &str) -> Vec<StreamFrame> {
        stream_frames(&self.answer(query), self.chunk_size)
    }

    pub fn stats(&self) -> ConciergeStats {
        ConciergeStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            answers_computed: self.answers_computed.load(Ordering::Relaxed),
            cached_entries: self.cache.as_ref().map_or(0, ResponseCache::len),
        }
    }

    fn compute(&self, query: &str) -> String {
        self.answers_computed.fetch_add(1, Ordering::Relaxed);
        self.builder.build(query)
    }
}

impl Default for Concierge {
    fn default() -> Self {
        Self::new(AnswerBuilder::default(), ResponseCache::with_defaults())
    }
}
