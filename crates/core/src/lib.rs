//! # Concierge Core
//!
//! Retrieval and answer assembly for the Magical Palace concierge. This crate
//! has no web or async dependencies: it answers a guest query synchronously
//! and leaves transport to the gateway.
//!
//! ## Answer path
//!
//! 1. [`Concierge::answer`] looks the lowercased query up in the
//!    [`ResponseCache`].
//! 2. On a miss, [`AnswerBuilder`] runs the ordered [`RuleChain`]; the first
//!    matching rule returns its canned text.
//! 3. Otherwise the [`Retriever`] scores [`KnowledgeStore`] records by token
//!    overlap and the top two are formatted.

pub mod answer;
pub mod cache;
pub mod clock;
pub mod concierge;
pub mod error;
pub mod knowledge;
pub mod retriever;
pub mod rules;
pub mod stream;
pub mod tokenizer;

// Re-export key types at crate root for ergonomics
pub use answer::AnswerBuilder;
pub use cache::{CacheEntry, ResponseCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use concierge::{Concierge, ConciergeStats};
pub use error::{Error, KnowledgeError, Result};
pub use knowledge::{KnowledgeRecord, KnowledgeStore};
pub use retriever::Retriever;
pub use rules::{Matcher, Rule, RuleChain};
pub use stream::{StreamFrame, END_MARKER};
pub use tokenizer::tokenize;
