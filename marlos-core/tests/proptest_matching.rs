//! Property-based tests for normalization and knowledge-base matching.
//!
//! These check the invariants the matcher relies on: folding is
//! idempotent and case/accent-blind, and a message containing a trigger
//! phrase always resolves to the first entry that owns a contained key.

use proptest::prelude::*;

use marlos_core::knowledge::{KnowledgeBase, KnowledgeEntry};
use marlos_core::normalize;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Mixed-case Spanish-ish text with accents and punctuation.
fn arb_phrase() -> impl Strategy<Value = String> {
    "[a-zA-ZáéíóúñÁÉÍÓÚÑü0-9 ¿?¡!.,_-]{0,40}"
}

fn arb_key() -> impl Strategy<Value = String> {
    "[a-z]{2,8}( [a-z]{2,8}){0,2}"
}

// ---------------------------------------------------------------------------
// Property: normalization is idempotent
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn normalize_idempotent(text in any::<String>()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }
}

// ---------------------------------------------------------------------------
// Property: output alphabet is [a-z0-9_ ] with single inner spaces
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn normalize_output_shape(text in any::<String>()) {
        let out = normalize(&text);
        prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == ' '));
        prop_assert!(!out.starts_with(' '));
        prop_assert!(!out.ends_with(' '));
        prop_assert!(!out.contains("  "));
    }
}

// ---------------------------------------------------------------------------
// Property: case does not matter
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn normalize_case_insensitive(text in arb_phrase()) {
        prop_assert_eq!(normalize(&text.to_uppercase()), normalize(&text.to_lowercase()));
    }
}

// ---------------------------------------------------------------------------
// Property: a contained trigger resolves to the first owning entry
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn contained_key_resolves_first_owner(
        keys in prop::collection::vec(arb_key(), 1..6),
        pick in any::<prop::sample::Index>(),
        prefix in "[a-z ]{0,10}",
        suffix in "[a-z ]{0,10}",
    ) {
        let entries: Vec<KnowledgeEntry> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| KnowledgeEntry::new(&[k.as_str()], format!("reply {i}")))
            .collect();
        let kb = KnowledgeBase::new(entries).expect("generated keys are valid");

        let chosen = pick.get(&keys);
        let message = format!("{prefix} {} {suffix}", chosen.to_uppercase());
        let folded = normalize(&message);

        let hit = kb.lookup(&folded).expect("chosen key is contained");
        // No earlier entry may also be contained.
        let expected = keys
            .iter()
            .position(|k| folded.contains(normalize(k).as_str()))
            .expect("at least the chosen key");
        prop_assert_eq!(hit.index, expected);
        prop_assert_eq!(hit.reply, format!("reply {expected}"));
    }
}
