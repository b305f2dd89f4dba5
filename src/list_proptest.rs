//! Property-based tests for comma-separated list parsing.

use proptest::prelude::*;

use crate::config::parse_list;

fn entry() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_./-]{1,12}"
}

proptest! {
    #[test]
    fn parsed_entries_are_trimmed_and_non_empty(raw in "[a-z ,\t]{0,40}") {
        for entry in parse_list(&raw) {
            prop_assert!(!entry.is_empty());
            prop_assert_eq!(entry.trim(), entry.as_str());
            prop_assert!(!entry.contains(','));
        }
    }

    #[test]
    fn padding_and_blank_entries_do_not_change_result(
        entries in prop::collection::vec(entry(), 0..8),
        pad in "[ \t]{0,3}",
    ) {
        let plain = entries.join(",");
        let padded = entries
            .iter()
            .map(|e| format!("{pad}{e}{pad}"))
            .collect::<Vec<_>>()
            .join(&format!(",{pad},"));

        prop_assert_eq!(parse_list(&padded), parse_list(&plain));
    }

    #[test]
    fn order_and_duplicates_preserved(entries in prop::collection::vec(entry(), 0..8)) {
        let mut doubled = entries.clone();
        doubled.extend(entries.iter().cloned());
        prop_assert_eq!(parse_list(&doubled.join(",")), doubled);
    }
}
