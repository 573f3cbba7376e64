//! Keyword-based intent detection for caller utterances

use crate::profile::{BusinessProfile, MenuItem};
use regex::Regex;
use std::sync::LazyLock;

/// What the caller appears to be asking for
///
/// Variant order is the order replies are produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Intent {
    Greeting,
    Hours,
    Location,
    Phone,
    Menu,
    Takeaway,
    Allergens,
    Price,
    Order,
    Finish,
    Affirm,
    Deny,
    Goodbye,
}

static PATTERNS: LazyLock<Vec<(Intent, Regex)>> = LazyLock::new(|| {
    [
        (Intent::Greeting, r"\b(hello|hi|hey|good (morning|afternoon|evening))\b"),
        (
            Intent::Hours,
            r"\b(open|opening|close|closing|closed|hours|what time|when)\b",
        ),
        (
            Intent::Location,
            r"\b(where|address|located|location|directions|find you)\b",
        ),
        (Intent::Phone, r"\b(phone|number|call you back|contact)\b"),
        (Intent::Menu, r"\b(menu|dishes|what do you (have|serve)|options)\b"),
        (
            Intent::Takeaway,
            r"\b(takeaway|take away|take-away|takeout|take out|pickup|pick up|collect)\b",
        ),
        (
            Intent::Allergens,
            r"\b(allergen|allergens|allergy|allergies|gluten|dairy|nuts?|vegan|vegetarian)\b",
        ),
        (Intent::Price, r"\b(price|cost|how much)\b"),
        (
            Intent::Order,
            r"\b(order|i'd like|i would like|i'll have|i will have|can i get|can i have)\b",
        ),
        (
            Intent::Finish,
            r"\b(that's all|that is all|that's it|that is it|nothing else|all done)\b",
        ),
        (Intent::Affirm, r"\b(yes|yeah|yep|correct|confirm|sure|please do)\b"),
        (Intent::Deny, r"\b(no|nope|cancel|never mind|nevermind)\b"),
        (
            Intent::Goodbye,
            r"\b(bye|goodbye|good bye|that's everything|hang up)\b",
        ),
    ]
    .into_iter()
    .map(|(intent, pattern)| {
        let regex = Regex::new(&format!("(?i){pattern}"))
            .unwrap_or_else(|e| panic!("invalid intent pattern for {intent:?}: {e}"));
        (intent, regex)
    })
    .collect()
});

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}|a|an|one|two|three|four|five|six|seven|eight|nine|ten)\s+$")
        .unwrap_or_else(|e| panic!("invalid quantity pattern: {e}"))
});

/// Detect every intent present in an utterance, in reply order
pub fn detect(utterance: &str) -> Vec<Intent> {
    let mut intents: Vec<Intent> = PATTERNS
        .iter()
        .filter(|(_, regex)| regex.is_match(utterance))
        .map(|(intent, _)| *intent)
        .collect();
    intents.sort();
    intents.dedup();
    intents
}

/// A menu item named in an utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMention<'a> {
    pub item: &'a MenuItem,
    pub quantity: u32,
}

/// Find menu items named in the utterance, in menu order
///
/// A number directly before the item name ("two margherita") sets the
/// quantity; otherwise it is one.
pub fn mentioned_items<'a>(utterance: &str, profile: &'a BusinessProfile) -> Vec<ItemMention<'a>> {
    let lowered = utterance.to_lowercase();
    profile
        .menu
        .iter()
        .filter_map(|item| {
            let name = item.name.to_lowercase();
            if name.is_empty() {
                return None;
            }
            let start = find_word(&lowered, &name)?;
            let quantity = lowered
                .get(..start)
                .and_then(|prefix| QUANTITY.captures(prefix))
                .and_then(|caps| caps.get(1))
                .map_or(1, |m| parse_quantity(m.as_str()));
            Some(ItemMention { item, quantity })
        })
        .collect()
}

/// Byte offset of `needle` in `haystack` at word boundaries
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    let pattern = format!(r"\b{}\b", regex::escape(needle));
    Regex::new(&pattern)
        .ok()?
        .find(haystack)
        .map(|m| m.start())
}

fn parse_quantity(word: &str) -> u32 {
    match word.to_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => digits.parse().unwrap_or(1).max(1),
    }
}
