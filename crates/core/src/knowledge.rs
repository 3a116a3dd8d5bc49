//! Knowledge store: the hotel's short, bullet-based guide.
//!
//! Records are loaded once at startup, either from the built-in table or from a
//! TOML file, and never change afterwards. A record's identity is its position
//! in the store.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::KnowledgeError;
use crate::tokenizer::tokenize;

/// A titled guide entry with tags and short bullet facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl KnowledgeRecord {
    pub fn new(title: &str, tags: &[&str], bullets: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
        }
    }

    /// Title, tags and bullets joined by single spaces, in that order.
    pub fn searchable_text(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.tags.iter().map(String::as_str))
            .chain(self.bullets.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Immutable, ordered collection of knowledge records.
///
/// Each record's token set is computed once at construction so retrieval only
/// has to tokenize the query.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    records: Vec<KnowledgeRecord>,
    token_sets: Vec<HashSet<String>>,
}

/// On-disk layout of a knowledge file: a list of `[[records]]` tables.
#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    #[serde(default)]
    records: Vec<KnowledgeRecord>,
}

impl KnowledgeStore {
    pub fn new(records: Vec<KnowledgeRecord>) -> Self {
        let token_sets = records
            .iter()
            .map(|r| tokenize(&r.searchable_text()).into_iter().collect())
            .collect();
        Self {
            records,
            token_sets,
        }
    }

    /// The hotel's built-in guide.
    pub fn builtin() -> Self {
        Self::new(builtin_records())
    }

    /// Load records from a TOML file with `[[records]]` entries.
    pub fn load_from(path: &Path) -> Result<Self, KnowledgeError> {
        let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let store = Self::from_toml_str(&content).map_err(|e| match e {
            KnowledgeError::ParseError { reason, .. } => KnowledgeError::ParseError {
                path: path.to_path_buf(),
                reason,
            },
            KnowledgeError::Empty { .. } => KnowledgeError::Empty {
                path: path.to_path_buf(),
            },
            other => other,
        })?;
        tracing::info!(
            path = %path.display(),
            records = store.len(),
            "Loaded knowledge file"
        );
        Ok(store)
    }

    /// Parse records from TOML text. Paths in errors are left empty.
    pub fn from_toml_str(content: &str) -> Result<Self, KnowledgeError> {
        let file: KnowledgeFile =
            toml::from_str(content).map_err(|e| KnowledgeError::ParseError {
                path: Default::default(),
                reason: e.to_string(),
            })?;

        if file.records.is_empty() {
            return Err(KnowledgeError::Empty {
                path: Default::default(),
            });
        }

        for (index, record) in file.records.iter().enumerate() {
            if record.title.trim().is_empty() {
                return Err(KnowledgeError::InvalidRecord {
                    index,
                    reason: "title is blank".into(),
                });
            }
        }

        Ok(Self::new(file.records))
    }

    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records paired with their precomputed token sets, in table order.
    pub fn indexed(&self) -> impl Iterator<Item = (&KnowledgeRecord, &HashSet<String>)> {
        self.records.iter().zip(self.token_sets.iter())
    }
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_records() -> Vec<KnowledgeRecord> {
    vec![
        KnowledgeRecord::new(
            "Check-in and Check-out",
            &["checkin", "checkout", "front desk", "arrival", "departure", "policy"],
            &[
                "Check-in: 2:00 PM",
                "Check-out: 11:00 AM",
                "Early check-in / late check-out depends on availability (Reception can confirm).",
                "Luggage storage is available at Reception.",
            ],
        ),
        KnowledgeRecord::new(
            "Breakfast",
            &["breakfast", "food", "dining", "morning", "buffet", "menu"],
            &[
                "Breakfast is served daily: 7:00 AM – 10:30 AM",
                "Ask for vegetarian options or allergies—staff can help.",
                "If you’re leaving early, ask Reception about a packed breakfast.",
            ],
        ),
        KnowledgeRecord::new(
            "Room Service",
            &[
                "room service",
                "in-room dining",
                "order food",
                "lunch",
                "dinner",
                "snacks",
                "call",
                "menu",
            ],
            &[
                "Hours: 24/7 (limited menu after 11:00 PM).",
                "To order: call Reception or use the in-room phone (Room Service).",
                "Typical delivery time: 25–45 minutes (depends on rush hours).",
                "Mention allergies or dietary preferences when ordering.",
            ],
        ),
        KnowledgeRecord::new(
            "Wi-Fi access",
            &["wifi", "internet", "password", "network"],
            &[
                "Connect to: MagicalPalace-Guest",
                "If you need a password: Reception will provide it (may vary by booking).",
                "If it won’t connect: forget the network → reconnect, or restart Wi-Fi on your device.",
            ],
        ),
        KnowledgeRecord::new(
            "Pool and Gym",
            &["pool", "gym", "fitness", "wellness"],
            &[
                "Gym: 6:00 AM – 10:00 PM",
                "Pool: 7:00 AM – 8:00 PM",
                "Bring your room key. Towels may be provided poolside.",
            ],
        ),
        KnowledgeRecord::new(
            "Spa",
            &["spa", "massage", "relax", "wellness"],
            &[
                "Spa requires booking.",
                "Evenings are busy—book earlier if possible.",
                "Tell us what you want: relaxation, deep tissue, or quick refresh.",
            ],
        ),
        KnowledgeRecord::new(
            "Airport transfer",
            &["airport", "pickup", "transfer", "taxi", "car"],
            &[
                "Airport pickup can be arranged via Reception.",
                "Share flight number + arrival time.",
                "Mention large luggage if you have it.",
            ],
        ),
        KnowledgeRecord::new(
            "Nearby attraction: Riverfront Promenade",
            &["attraction", "nearby", "river", "walk", "sunset", "photos"],
            &[
                "Best for: sunset views + calm walk",
                "Go early if you want fewer crowds.",
                "Carry water if it’s hot outside.",
            ],
        ),
        KnowledgeRecord::new(
            "Nearby attraction: Old Town Walk",
            &["attraction", "nearby", "old town", "history", "food", "evening"],
            &[
                "Best for: evening stroll + street food",
                "Sunset timing feels nicest.",
                "Tell me what you like (history / food / shopping) and I’ll suggest stops.",
            ],
        ),
        KnowledgeRecord::new(
            "Nearby attraction: Local Handicraft Market",
            &["attraction", "market", "shopping", "souvenirs", "crafts"],
            &[
                "Best for: gifts and local crafts",
                "Bargaining is common—keep it polite.",
                "Ask the hotel for recommended stalls.",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_store_has_ten_records_in_order() {
        let store = KnowledgeStore::builtin();
        assert_eq!(store.len(), 10);
        assert_eq!(store.records()[0].title, "Check-in and Check-out");
        assert_eq!(store.records()[4].title, "Pool and Gym");
        assert_eq!(
            store.records()[9].title,
            "Nearby attraction: Local Handicraft Market"
        );
    }

    #[test]
    fn token_sets_cover_title_tags_and_bullets() {
        let store = KnowledgeStore::builtin();
        let (record, tokens) = store.indexed().nth(4).unwrap();
        assert_eq!(record.title, "Pool and Gym");
        assert!(tokens.contains("pool"));
        assert!(tokens.contains("fitness"));
        assert!(tokens.contains("towels"));
        assert!(!tokens.contains("spa"));
    }

    #[test]
    fn searchable_text_joins_with_spaces() {
        let record = KnowledgeRecord::new("Spa", &["spa", "massage"], &["Book ahead."]);
        assert_eq!(record.searchable_text(), "Spa spa massage Book ahead.");
    }

    #[test]
    fn parses_records_from_toml() {
        let store = KnowledgeStore::from_toml_str(
            r#"
[[records]]
title = "Parking"
tags = ["parking", "car"]
bullets = ["Valet parking is free for guests."]

[[records]]
title = "Laundry"
bullets = ["Same-day service if dropped before 9 AM."]
"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.records()[1].tags.is_empty());
    }

    #[test]
    fn empty_record_list_rejected() {
        let err = KnowledgeStore::from_toml_str("records = []").unwrap_err();
        assert!(matches!(err, KnowledgeError::Empty { .. }));
    }

    #[test]
    fn blank_title_rejected() {
        let err = KnowledgeStore::from_toml_str(
            r#"
[[records]]
title = "  "
"#,
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn load_from_file_reports_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[records]]\ntitle = ").unwrap();
        let err = KnowledgeStore::load_from(file.path()).unwrap_err();
        match err {
            KnowledgeError::ParseError { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_from_missing_file_is_read_error() {
        let err = KnowledgeStore::load_from(Path::new("/nonexistent/cards.toml")).unwrap_err();
        assert!(matches!(err, KnowledgeError::ReadError { .. }));
    }

    #[test]
    fn load_from_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[records]]\ntitle = \"Parking\"\ntags = [\"parking\"]\nbullets = [\"Free valet.\"]"
        )
        .unwrap();
        let store = KnowledgeStore::load_from(file.path()).unwrap();
        assert_eq!(store.records()[0].title, "Parking");
    }
}
