//! Answer value codec.
//!
//! Every question stores exactly one string in the answer map. Multi-part
//! answers are JSON arrays in that string. Decoding never fails: anything
//! that is not a well-formed array decodes to an empty value, which widgets
//! treat as "no prior answer".

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Per-slot 1-based positions into the canonical step list; `None` is an unset slot.
pub type SlotAssignment = Vec<Option<usize>>;

/// Decode a wire string into a list, or an empty list if it is not one.
pub fn decode_list<T: DeserializeOwned>(value: &str) -> Vec<T> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<T>>(value) {
        Ok(items) => items,
        Err(e) => {
            debug!(error = %e, "stored answer is not a list; treating as unanswered");
            Vec::new()
        }
    }
}

/// Encode a list to its wire string, preserving element order.
pub fn encode_list<T: Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|e| {
        warn!(error = %e, "failed to encode answer list");
        "[]".to_string()
    })
}

/// Decode a wire string as an unordered set of identifiers.
pub fn decode_set(value: &str) -> BTreeSet<String> {
    decode_list::<String>(value).into_iter().collect()
}

/// Map each saved label to its 1-based position in `canonical_steps`.
///
/// Labels not present in the canonical order become unset slots.
pub fn reconcile_ordered_slots(saved_labels: &[String], canonical_steps: &[String]) -> SlotAssignment {
    saved_labels
        .iter()
        .map(|label| {
            canonical_steps
                .iter()
                .position(|step| step.trim() == label.trim())
                .map(|i| i + 1)
        })
        .collect()
}

/// Read slots in order and emit the step each one points at.
///
/// Unset and out-of-range positions are skipped rather than emitted as placeholders.
pub fn project_slots_to_labels(slots: &[Option<usize>], canonical_steps: &[String]) -> Vec<String> {
    slots
        .iter()
        .filter_map(|&slot| {
            slot.and_then(|pos| pos.checked_sub(1))
                .and_then(|i| canonical_steps.get(i))
                .cloned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn list_roundtrip_keeps_order_and_empties() {
        let items = strings(&["B", "", "a \"quoted\" word", "A"]);
        let wire = encode_list(&items);
        assert_eq!(decode_list::<String>(&wire), items);
    }

    #[test]
    fn malformed_values_decode_to_empty() {
        for bad in ["", "   ", "not json", "{\"a\":1}", "\"scalar\"", "[1, 2"] {
            assert!(decode_list::<String>(bad).is_empty(), "input: {bad}");
        }
    }

    #[test]
    fn set_decode_ignores_order() {
        assert_eq!(decode_set(r#"["b","a"]"#), decode_set(r#"["a","b"]"#));
        assert_eq!(decode_set(r#"["a","a"]"#).len(), 1);
    }

    #[test]
    fn reconcile_then_project_reproduces_labels() {
        let steps = strings(&["Mix", "Knead", "Proof", "Bake"]);
        let labels = strings(&["Proof", "Mix", "Bake"]);
        let slots = reconcile_ordered_slots(&labels, &steps);
        assert_eq!(slots, vec![Some(3), Some(1), Some(4)]);
        assert_eq!(project_slots_to_labels(&slots, &steps), labels);
    }

    #[test]
    fn unknown_labels_become_unset_slots() {
        let steps = strings(&["Mix", "Bake"]);
        let slots = reconcile_ordered_slots(&strings(&["Fry", " Bake "]), &steps);
        assert_eq!(slots, vec![None, Some(2)]);
    }

    #[test]
    fn projection_skips_gaps_and_out_of_range() {
        let steps = strings(&["Mix", "Bake"]);
        let slots = vec![Some(2), None, Some(0), Some(7), Some(1)];
        assert_eq!(project_slots_to_labels(&slots, &steps), strings(&["Bake", "Mix"]));
    }
}
