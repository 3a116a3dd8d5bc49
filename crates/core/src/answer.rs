//! Answer assembly: rule chain first, token-overlap retrieval as fallback.

use crate::knowledge::{KnowledgeRecord, KnowledgeStore};
use crate::retriever::{DEFAULT_TOP_K, Retriever};
use crate::rules::{PreparedQuery, RuleChain};

/// Returned when neither a rule nor retrieval finds anything.
pub const NOT_FOUND: &str = "Sorry, I couldn't find that in the Magical Palace guide.

Try: 'breakfast menu', 'room service', 'wifi', 'check-out', 'spa booking', or 'nearby attractions'.";

/// Heading for the multi-record summary.
pub const MULTI_RECORD_HEADER: &str = "Here are some helpful items:";

/// Maximum bullets shown for a single matched record.
const MAX_SINGLE_RECORD_BULLETS: usize = 3;

/// Turns a guest query into answer text. Total: every input yields a string.
#[derive(Debug, Clone)]
pub struct AnswerBuilder {
    rules: RuleChain,
    retriever: Retriever,
}

impl AnswerBuilder {
    pub fn new(rules: RuleChain, retriever: Retriever) -> Self {
        Self { rules, retriever }
    }

    /// Default rules over the given knowledge store.
    pub fn with_store(store: KnowledgeStore) -> Self {
        Self::new(RuleChain::default(), Retriever::new(store))
    }

    pub fn rules(&self) -> &RuleChain {
        &self.rules
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn build(&self, query: &str) -> String {
        let prepared = PreparedQuery::new(query);
        if let Some(rule) = self.rules.evaluate(&prepared) {
            tracing::debug!(rule = rule.name, "Rule matched");
            return rule.response.to_string();
        }

        let records = self.retriever.retrieve(query, DEFAULT_TOP_K);
        tracing::debug!(matches = records.len(), "Falling back to retrieval");

        match records.as_slice() {
            [] => NOT_FOUND.to_string(),
            [record] => format_single(record),
            many => format_summary(many),
        }
    }
}

impl Default for AnswerBuilder {
    fn default() -> Self {
        Self::with_store(KnowledgeStore::builtin())
    }
}

fn flatten(bullet: &str) -> String {
    bullet.replace('\n', " ").trim().to_string()
}

fn format_single(record: &KnowledgeRecord) -> String {
    let mut lines = vec![record.title.clone()];
    lines.extend(
        record
            .bullets
            .iter()
            .take(MAX_SINGLE_RECORD_BULLETS)
            .map(|b| format!("- {}", flatten(b))),
    );
    lines.join("\n")
}

fn format_summary(records: &[&KnowledgeRecord]) -> String {
    let mut lines = vec![MULTI_RECORD_HEADER.to_string()];
    for record in records {
        let first = record.bullets.first().map(|b| flatten(b)).unwrap_or_default();
        lines.push(format!("- {}: {}", record.title, first));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{BREAKFAST_MENU, CHECK_IN_OUT, WIFI};

    #[test]
    fn breakfast_anywhere_returns_menu() {
        let builder = AnswerBuilder::default();
        for q in [
            "breakfast",
            "Show BREAKFAST menu",
            "is there a vegan breakfast and a spa?",
            "BreakFast wifi pool",
        ] {
            assert_eq!(builder.build(q), BREAKFAST_MENU, "query: {q}");
        }
    }

    #[test]
    fn checkout_phrasings_share_policy_text() {
        let builder = AnswerBuilder::default();
        assert_eq!(builder.build("what time is checkout"), CHECK_IN_OUT);
        assert_eq!(builder.build("CHECK-OUT"), CHECK_IN_OUT);
    }

    #[test]
    fn wifi_rule_wins_over_multi_topic_retrieval() {
        let builder = AnswerBuilder::default();
        assert_eq!(builder.build("spa and wifi"), WIFI);
    }

    #[test]
    fn punctuation_only_query_is_not_found() {
        let builder = AnswerBuilder::default();
        assert_eq!(builder.build(""), NOT_FOUND);
        assert_eq!(builder.build("?!?"), NOT_FOUND);
        assert_eq!(builder.build("   ...   "), NOT_FOUND);
    }

    #[test]
    fn single_record_shows_title_and_three_bullets() {
        let builder = AnswerBuilder::default();
        assert_eq!(
            builder.build("pool"),
            "Pool and Gym\n\
             - Gym: 6:00 AM – 10:00 PM\n\
             - Pool: 7:00 AM – 8:00 PM\n\
             - Bring your room key. Towels may be provided poolside."
        );
    }

    #[test]
    fn single_record_truncates_to_three_bullets_and_flattens_newlines() {
        let store = KnowledgeStore::new(vec![KnowledgeRecord::new(
            "Parking",
            &["parking"],
            &["Valet\nparking ", "Free", "Covered", "EV chargers"],
        )]);
        let builder = AnswerBuilder::with_store(store);
        assert_eq!(
            builder.build("parking?"),
            "Parking\n- Valet parking\n- Free\n- Covered"
        );
    }

    #[test]
    fn two_records_show_summary() {
        // One point each, so table order decides.
        let builder = AnswerBuilder::default();
        assert_eq!(
            builder.build("massage gym"),
            "Here are some helpful items:\n\
             - Pool and Gym: Gym: 6:00 AM – 10:00 PM\n\
             - Spa: Spa requires booking."
        );
    }

    #[test]
    fn function_words_count_toward_overlap() {
        // "tell" and "me" both appear in the Old Town card, "about" in Breakfast,
        // so the pool card loses the tie-break on table order.
        let builder = AnswerBuilder::default();
        let answer = builder.build("tell me about the pool");
        assert!(answer.starts_with(MULTI_RECORD_HEADER));
        assert!(answer.contains("- Nearby attraction: Old Town Walk: Best for: evening stroll + street food"));
        assert!(answer.contains("- Breakfast: Breakfast is served daily"));
    }

    #[test]
    fn summary_handles_record_without_bullets() {
        let store = KnowledgeStore::new(vec![
            KnowledgeRecord::new("Parking", &["car"], &[]),
            KnowledgeRecord::new("Taxi", &["car"], &["Ask Reception."]),
        ]);
        let builder = AnswerBuilder::new(RuleChain::empty(), Retriever::new(store));
        assert_eq!(
            builder.build("car"),
            "Here are some helpful items:\n- Parking: \n- Taxi: Ask Reception."
        );
    }

    #[test]
    fn unknown_words_are_not_found() {
        let builder = AnswerBuilder::default();
        assert_eq!(builder.build("xylophone zebra"), NOT_FOUND);
    }
}
