use proptest::prelude::*;

use badge_naming::{Category, Module, NamingError, NamingResolver};
use badge_types::{ModuleKey, PolicyParams};

fn module(short: &str, categories: Vec<(String, Vec<String>)>) -> Module {
    let mut m = Module::new(ModuleKey::parse("prop").unwrap(), "Prop Module", short, "prop");
    for (name, subs) in categories {
        m = m.category(Category::new(name, subs));
    }
    m
}

fn tree() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec(
        (
            "[A-Za-z][A-Za-z ]{0,40}",
            prop::collection::vec("[A-Za-z][A-Za-z ]{0,40}", 0..4),
        ),
        0..4,
    )
}

proptest! {
    /// Either every title fits the bound or resolution fails; never truncation.
    #[test]
    fn titles_fit_or_resolution_fails(short in "[A-Za-z]{1,12}", cats in tree()) {
        let resolver = NamingResolver::new(&PolicyParams::default());
        match resolver.resolve(&module(&short, cats.clone())) {
            Ok(naming) => {
                for title in naming.titles() {
                    prop_assert!(title.chars().count() <= 50, "{title}");
                }
                let expected: usize = 1 + cats.iter().map(|(_, s)| 1 + s.len()).sum::<usize>();
                prop_assert_eq!(naming.nodes().len(), expected);
            }
            Err(NamingError::TitleTooLong { title, len, limit, .. }) => {
                prop_assert!(len > limit);
                prop_assert_eq!(title.chars().count(), len);
            }
        }
    }

    /// Descriptions always carry the untranslated, unshortened names.
    #[test]
    fn descriptions_use_full_names(short in "[A-Za-z]{1,8}", cats in tree()) {
        let resolver = NamingResolver::new(&PolicyParams::default());
        if let Ok(naming) = resolver.resolve(&module(&short, cats.clone())) {
            for (first, (name, subs)) in naming.first_levels.iter().zip(cats.iter()) {
                prop_assert_eq!(&first.node.description, &format!("Verified Prop Module: {name}"));
                for (child, sub) in first.children.iter().zip(subs.iter()) {
                    prop_assert_eq!(
                        &child.description,
                        &format!("Verified Prop Module: {name} - {sub}")
                    );
                }
            }
        }
    }
}
