//! Keyword rule chain.
//!
//! Known high-frequency intents (check-in times, menus, attractions, airport
//! transfer, Wi-Fi) have curated answers. The chain is an ordered list of
//! `(predicate, response)` pairs; the first predicate that matches wins and no
//! later rule is consulted.

use std::collections::HashSet;

use crate::tokenizer::tokenize;

/// A query after the one-time preprocessing every predicate needs.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub lowered: String,
    pub tokens: HashSet<String>,
}

impl PreparedQuery {
    pub fn new(query: &str) -> Self {
        Self {
            lowered: query.to_lowercase(),
            tokens: tokenize(query).into_iter().collect(),
        }
    }
}

/// The predicate half of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Matches when any literal occurs in the lowercased query.
    AnySubstring(&'static [&'static str]),
    /// Matches when any literal is one of the query's tokens.
    AnyToken(&'static [&'static str]),
}

impl Matcher {
    pub fn matches(&self, query: &PreparedQuery) -> bool {
        match self {
            Matcher::AnySubstring(needles) => needles.iter().any(|n| query.lowered.contains(n)),
            Matcher::AnyToken(tokens) => tokens.iter().any(|t| query.tokens.contains(*t)),
        }
    }
}

/// A named predicate with its canned response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub matcher: Matcher,
    pub response: &'static str,
}

/// Ordered rules; index 0 has the highest priority.
#[derive(Debug, Clone)]
pub struct RuleChain {
    rules: Vec<Rule>,
}

impl RuleChain {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// A chain with no rules. Every query falls through to retrieval.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First rule whose predicate matches, if any.
    pub fn evaluate(&self, query: &PreparedQuery) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matcher.matches(query))
    }
}

impl Default for RuleChain {
    fn default() -> Self {
        Self::new(vec![
            Rule {
                name: "check_in_out",
                matcher: Matcher::AnySubstring(&[
                    "check-in",
                    "checkin",
                    "check in",
                    "checkout",
                    "check-out",
                    "check out",
                ]),
                response: CHECK_IN_OUT,
            },
            Rule {
                name: "breakfast",
                matcher: Matcher::AnySubstring(&["breakfast"]),
                response: BREAKFAST_MENU,
            },
            Rule {
                name: "room_service",
                matcher: Matcher::AnySubstring(&[
                    "room service",
                    "in-room",
                    "in room",
                    "order food",
                    "dinner",
                    "lunch",
                ]),
                response: ROOM_SERVICE_MENU,
            },
            Rule {
                name: "attractions",
                matcher: Matcher::AnySubstring(&["attraction", "attractions", "nearby", "near"]),
                response: ATTRACTIONS,
            },
            Rule {
                name: "airport_transfer",
                matcher: Matcher::AnySubstring(&["airport", "transfer", "pickup", "pick-up"]),
                response: AIRPORT_TRANSFER,
            },
            // "wi-fi" tokenizes to ["wi", "fi"], so only the joined form can match here.
            Rule {
                name: "wifi",
                matcher: Matcher::AnyToken(&["wifi"]),
                response: WIFI,
            },
        ])
    }
}

pub const CHECK_IN_OUT: &str = "Check-in and Check-out
- Check-in time: 2:00 PM
- Check-out time: 11:00 AM
- Early check-in or late check-out is subject to availability.
- Luggage storage is available at Reception.";

pub const BREAKFAST_MENU: &str = "Breakfast (7:00 AM – 10:30 AM)
- Served daily in the restaurant.
- Vegetarian options available. Please mention allergies.

Breakfast Menu (Sample)
• Hot Dishes
  - Masala omelette / Plain omelette
  - Pancakes with honey or maple syrup
  - Idli & sambar
  - Poha (light & savory)

• Fresh Bakery
  - Croissants, muffins, toast
  - Butter, jam, peanut butter

• Healthy Corner
  - Seasonal fruit bowl
  - Yogurt + granola
  - Oats porridge (milk / water)

• Beverages
  - Tea (assam / green), coffee
  - Fresh juice (seasonal)

If you’re leaving early, Reception can arrange a packed breakfast on request.";

pub const ROOM_SERVICE_MENU: &str = "Room Service (In-room Dining)
- Hours: 24/7 (limited menu after 11:00 PM)
- To order: call Reception or use the in-room phone (Room Service)
- Typical delivery time: 25–45 minutes
- Please mention allergies or dietary preferences

Room Service Menu (Popular picks)
• Snacks
  - French fries
  - Veg sandwich / Chicken sandwich
  - Soup of the day

• Mains
  - Butter paneer + naan
  - Veg biryani / Chicken biryani
  - Pasta (white sauce / red sauce)

• Drinks
  - Tea / Coffee
  - Soft drinks / Fresh juice

Tell me what you want (veg/non-veg, spicy/mild) and I’ll suggest a few options.";

pub const ATTRACTIONS: &str = "Nearby Attractions
• Old Town Walk
  - Best for: evening strolls and street food
  - Ideal around sunset for the best atmosphere

• Riverfront Promenade
  - Best for: calm walks and sunset views
  - Less crowded earlier in the evening

• Local Handicraft Market
  - Best for: gifts and local crafts";

pub const AIRPORT_TRANSFER: &str = "Airport Transfer
- Airport pickup and drop-off can be arranged through Reception.
- Please share your flight number and arrival or departure time.
- If you have large luggage, let Reception know in advance.";

pub const WIFI: &str = "Wi-Fi Access
- Connect to the network: MagicalPalace-Guest
- If a password is required, Reception will provide it (this may vary by booking).
- If your device doesn’t connect, try forgetting the network and reconnecting.";
