#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use badge_naming::{Category, Module, NamingResolver};
use badge_types::{ModuleKey, PolicyParams};

#[derive(Debug, Arbitrary)]
struct Input {
    display_name: String,
    short_name: String,
    categories: Vec<(String, Vec<String>)>,
    level1_translations: Vec<(String, String)>,
    level2_translations: Vec<(String, String)>,
}

// Resolution must never panic, and a successful result never carries a
// title longer than the limit.
fuzz_target!(|input: Input| {
    let mut module = Module::new(
        ModuleKey::from_static("fuzz"),
        input.display_name,
        input.short_name,
        "fuzz",
    );
    for (name, subs) in input.categories.into_iter().take(16) {
        module = module.category(Category::new(name, subs.into_iter().take(16)));
    }
    for (from, to) in input.level1_translations {
        module = module.level1_translation(from, to);
    }
    for (from, to) in input.level2_translations {
        module = module.level2_translation(from, to);
    }

    let params = PolicyParams::default();
    let resolver = NamingResolver::new(&params);
    if let Ok(naming) = resolver.resolve(&module) {
        for title in naming.titles() {
            assert!(title.chars().count() <= params.max_title_len);
        }
        let flat = naming.flatten();
        assert_eq!(flat.levels.len(), naming.first_levels.len());
    }
});
