use proptest::prelude::*;
use unglobal_core::kind::KindTable;
use unglobal_core::naming::{kebab_case, kebab_path};

proptest! {
    #[test]
    fn kebab_case_is_idempotent(name in "[A-Za-z0-9_]{0,24}") {
        let once = kebab_case(&name);
        prop_assert_eq!(kebab_case(&once), once);
    }

    #[test]
    fn kebab_case_output_is_lowercase(name in "[A-Za-z0-9_]{0,24}") {
        let out = kebab_case(&name);
        prop_assert!(out.chars().all(|c| !c.is_ascii_uppercase()));
    }

    #[test]
    fn kebab_path_preserves_segment_count(
        segments in prop::collection::vec("[A-Za-z0-9_]{1,12}", 1..5)
    ) {
        let path = segments.join("/");
        let out = kebab_path(&path);
        prop_assert_eq!(out.split('/').count(), segments.len());
    }

    #[test]
    fn classify_is_deterministic(
        name in "[A-Za-z]{1,20}",
        path in "[a-z/]{1,20}",
    ) {
        let table = KindTable::default();
        let a = table.classify(Some(&name), &path).cloned();
        let b = table.classify(Some(&name), &path).cloned();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn name_match_wins_over_any_path(path in "[a-z/]{1,20}") {
        let table = KindTable::default();
        // "FooSerializer" carries a kind word, so the path must not matter.
        let kind = table.classify(Some("FooSerializer"), &path).unwrap();
        prop_assert_eq!(kind.name.as_str(), "serializer");
    }
}
