use proptest::prelude::*;

use badge_types::{Handle, ModuleKey, Timestamp};

proptest! {
    /// Parsing is idempotent: a normalized handle parses to itself.
    #[test]
    fn handle_parse_idempotent(raw in "[ \t]{0,3}[A-Za-z0-9.]{1,30}[ \t]{0,3}") {
        let once = Handle::parse(&raw).unwrap();
        let twice = Handle::parse(once.as_str()).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Normalized handles never carry upper-case letters or surrounding whitespace.
    #[test]
    fn handle_is_lowercase_and_trimmed(raw in "[ ]{0,2}[A-Za-z0-9.]{1,30}[ ]{0,2}") {
        let h = Handle::parse(&raw).unwrap();
        prop_assert_eq!(h.as_str(), h.as_str().trim());
        prop_assert!(!h.as_str().chars().any(|c| c.is_ascii_uppercase()));
    }

    /// Module keys never contain the record-key separator.
    #[test]
    fn module_key_never_contains_dash(raw in "[a-z0-9-]{1,12}") {
        match ModuleKey::parse(&raw) {
            Ok(key) => prop_assert!(!key.as_str().contains('-')),
            Err(_) => prop_assert!(raw.contains('-')),
        }
    }

    /// Timestamp formatting always yields the fixed-width millisecond form.
    #[test]
    fn timestamp_format_is_fixed_width(millis in 0u64..4_102_444_800_000) {
        let s = Timestamp::from_millis(millis).to_rfc3339();
        prop_assert_eq!(s.len(), 24);
        prop_assert!(s.ends_with('Z'));
    }
}
