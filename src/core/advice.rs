//! Canned financial advice matched on keywords.
//!
//! The first matching rule wins; matching is case-insensitive and substring-based,
//! so "foodie" counts as "food".

/// Reply when no keyword matches
pub const DEFAULT_REPLY: &str =
    "I need more data to give precise advice. Try adding some expense entries first.";

const RULES: &[(&[&str], &str)] = &[
    (
        &["food"],
        "You've spent a lot on food; try a weekly meal plan to reduce costs.",
    ),
    (
        &["travel"],
        "Travel expenses are high. Consider public transport or carpooling.",
    ),
    (
        &["saving", "save"],
        "Set a fixed monthly target and automate transfers to savings.",
    ),
];

/// Picks the canned reply for `message`.
#[must_use]
pub fn reply_to(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map_or(DEFAULT_REPLY, |(_, reply)| *reply)
}
