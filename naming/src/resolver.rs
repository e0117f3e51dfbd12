//! Naming resolver — module configuration to length-bounded titles.
//!
//! Titles are tried from most to least descriptive:
//!
//! 1. `Verified {short}: {category}[ - {sub}]`
//! 2. `Ver. {short}: …` (shortened module prefix)
//! 3. the category (first level) or subcategory (second level) replaced by
//!    its translation, when the module defines one
//! 4. second level only: the first-level category replaced by its translation
//!    as well
//!
//! The first candidate within the bound wins. If none fits, resolution fails
//! with the last candidate tried. Titles are never truncated and descriptions
//! are never shortened.

use badge_types::{ModuleKey, PolicyParams};
use serde::Serialize;

use crate::error::{NamingError, NamingLevel};
use crate::module::Module;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamingNode {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirstLevel {
    pub node: NamingNode,
    pub children: Vec<NamingNode>,
}

/// The resolved naming tree of one module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Naming {
    pub module_key: ModuleKey,
    pub root: NamingNode,
    pub first_levels: Vec<FirstLevel>,
}

impl Naming {
    /// Every node in visiting order: root, then each first level followed by
    /// its second levels, in hierarchy declaration order.
    pub fn nodes(&self) -> Vec<&NamingNode> {
        let mut nodes = vec![&self.root];
        for first in &self.first_levels {
            nodes.push(&first.node);
            nodes.extend(first.children.iter());
        }
        nodes
    }

    pub fn titles(&self) -> Vec<String> {
        self.nodes().into_iter().map(|n| n.title.clone()).collect()
    }

    pub fn flatten(&self) -> FlatNaming {
        FlatNaming {
            key: self.module_key.to_string(),
            title: self.root.title.clone(),
            description: self.root.description.clone(),
            levels: self
                .first_levels
                .iter()
                .map(|first| FlatLevel {
                    title: first.node.title.clone(),
                    description: first.node.description.clone(),
                    sublevels: first.children.clone(),
                })
                .collect(),
        }
    }
}

/// Read-only view of a naming tree with categories addressed by their titles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlatNaming {
    pub key: String,
    pub title: String,
    pub description: String,
    pub levels: Vec<FlatLevel>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlatLevel {
    pub title: String,
    pub description: String,
    pub sublevels: Vec<NamingNode>,
}

/// Pure, deterministic: the same module always yields the same naming.
#[derive(Clone, Debug)]
pub struct NamingResolver {
    max_title_len: usize,
}

impl NamingResolver {
    pub fn new(params: &PolicyParams) -> Self {
        Self {
            max_title_len: params.max_title_len,
        }
    }

    pub fn max_title_len(&self) -> usize {
        self.max_title_len
    }

    pub fn resolve(&self, module: &Module) -> Result<Naming, NamingError> {
        let full = format!("Verified {}", module.short_name);
        let short = format!("Ver. {}", module.short_name);
        let description = format!("Verified {}", module.display_name);

        let root = NamingNode {
            title: self.pick(NamingLevel::Root, vec![full.clone(), short.clone()])?,
            description: description.clone(),
        };

        let mut first_levels = Vec::with_capacity(module.hierarchy.len());
        for category in &module.hierarchy {
            let first = category.name.as_str();
            let first_translated = module.level1_translations.get(first);

            let mut candidates = vec![format!("{full}: {first}"), format!("{short}: {first}")];
            if let Some(t) = first_translated {
                candidates.push(format!("{short}: {t}"));
            }
            let node = NamingNode {
                title: self.pick(NamingLevel::First, candidates)?,
                description: format!("{description}: {first}"),
            };

            let mut children = Vec::with_capacity(category.subcategories.len());
            for second in &category.subcategories {
                let mut candidates = vec![
                    format!("{full}: {first} - {second}"),
                    format!("{short}: {first} - {second}"),
                ];
                // A translated subcategory stays translated for the next step.
                let mut sub = second.as_str();
                if let Some(t) = module.level2_translations.get(second) {
                    sub = t.as_str();
                    candidates.push(format!("{short}: {first} - {sub}"));
                }
                if let Some(t) = first_translated {
                    candidates.push(format!("{short}: {t} - {sub}"));
                }
                children.push(NamingNode {
                    title: self.pick(NamingLevel::Second, candidates)?,
                    description: format!("{description}: {first} - {second}"),
                });
            }

            first_levels.push(FirstLevel { node, children });
        }

        Ok(Naming {
            module_key: module.key.clone(),
            root,
            first_levels,
        })
    }

    pub fn resolve_flat(&self, module: &Module) -> Result<FlatNaming, NamingError> {
        Ok(self.resolve(module)?.flatten())
    }

    fn fits(&self, title: &str) -> bool {
        title.chars().count() <= self.max_title_len
    }

    fn pick(&self, level: NamingLevel, candidates: Vec<String>) -> Result<String, NamingError> {
        let mut last = String::new();
        for candidate in candidates {
            if self.fits(&candidate) {
                return Ok(candidate);
            }
            last = candidate;
        }
        Err(NamingError::TitleTooLong {
            level,
            len: last.chars().count(),
            title: last,
            limit: self.max_title_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Category;

    fn resolver() -> NamingResolver {
        NamingResolver::new(&PolicyParams::default())
    }

    fn key(s: &str) -> ModuleKey {
        ModuleKey::parse(s).unwrap()
    }

    fn mvp_like() -> Module {
        Module::new(
            key("mvp"),
            "Microsoft Most Valuable Professionals (MVPs)",
            "MVPs",
            "ms-mvp",
        )
        .category(Category::new(
            "AI Platform",
            ["Azure AI Services", "Azure Machine Learning Studio"],
        ))
        .category(Category::new(
            "Cloud and Datacenter Management",
            ["Hyper-V"],
        ))
        .level1_translation("Cloud and Datacenter Management", "CDM")
        .level2_translation("Azure Machine Learning Studio", "Azure ML Studio")
    }

    #[test]
    fn root_only_module() {
        let module = Module::new(key("ghstar"), "Github Stars", "GitHub Stars", "ghstar");
        let naming = resolver().resolve(&module).unwrap();
        assert_eq!(naming.root.title, "Verified GitHub Stars");
        assert_eq!(naming.root.description, "Verified Github Stars");
        assert!(naming.first_levels.is_empty());
        assert_eq!(naming.titles(), vec!["Verified GitHub Stars".to_string()]);
    }

    #[test]
    fn full_form_used_when_it_fits() {
        let naming = resolver().resolve(&mvp_like()).unwrap();
        let ai = &naming.first_levels[0];
        assert_eq!(ai.node.title, "Verified MVPs: AI Platform");
        assert_eq!(
            ai.node.description,
            "Verified Microsoft Most Valuable Professionals (MVPs): AI Platform"
        );
        assert_eq!(ai.children[0].title, "Verified MVPs: AI Platform - Azure AI Services");
    }

    #[test]
    fn subcategory_translation_applied_after_prefix_shortening() {
        let naming = resolver().resolve(&mvp_like()).unwrap();
        let ml = &naming.first_levels[0].children[1];
        assert_eq!(ml.title, "Ver. MVPs: AI Platform - Azure ML Studio");
        assert_eq!(
            ml.description,
            "Verified Microsoft Most Valuable Professionals (MVPs): AI Platform - Azure Machine Learning Studio"
        );
    }

    #[test]
    fn category_translation_used_for_second_level() {
        let naming = resolver().resolve(&mvp_like()).unwrap();
        let cdm = &naming.first_levels[1];
        assert_eq!(cdm.node.title, "Verified MVPs: Cloud and Datacenter Management");
        assert_eq!(cdm.children[0].title, "Ver. MVPs: CDM - Hyper-V");
    }

    #[test]
    fn shortened_prefix_for_first_level() {
        let module = Module::new(key("x"), "Long", "Quite Long Module Short Name", "x")
            .category(Category::new("Things Of Note", Vec::<String>::new()));
        let naming = resolver().resolve(&module).unwrap();
        assert_eq!(naming.root.title, "Verified Quite Long Module Short Name");
        assert_eq!(
            naming.first_levels[0].node.title,
            "Ver. Quite Long Module Short Name: Things Of Note"
        );
    }

    #[test]
    fn fails_instead_of_truncating() {
        let module = Module::new(key("x"), "X", "X", "x").category(Category::new(
            "A category name that is far too long to ever fit the bound",
            Vec::<String>::new(),
        ));
        let err = resolver().resolve(&module).unwrap_err();
        match err {
            NamingError::TitleTooLong { level, title, limit, .. } => {
                assert_eq!(level, NamingLevel::First);
                assert_eq!(limit, 50);
                assert!(title.starts_with("Ver. X: "));
            }
        }
    }

    #[test]
    fn second_level_error_names_last_candidate() {
        let module = Module::new(key("x"), "X", "X", "x")
            .category(Category::new(
                "Cat",
                ["An extraordinarily verbose subcategory without any translation"],
            ))
            .level1_translation("Cat", "C");
        let err = resolver().resolve(&module).unwrap_err();
        let NamingError::TitleTooLong { level, title, .. } = err;
        assert_eq!(level, NamingLevel::Second);
        assert_eq!(
            title,
            "Ver. X: C - An extraordinarily verbose subcategory without any translation"
        );
    }

    #[test]
    fn root_falls_back_to_shortened_prefix() {
        let short_name = "A Module Short Name Of Exactly Forty Four Ch";
        assert_eq!(short_name.len(), 44);
        let module = Module::new(key("x"), "X", short_name, "x");
        let naming = resolver().resolve(&module).unwrap();
        assert_eq!(naming.root.title, format!("Ver. {short_name}"));
    }

    #[test]
    fn nodes_visit_depth_first_in_declaration_order() {
        let naming = resolver().resolve(&mvp_like()).unwrap();
        let titles = naming.titles();
        assert_eq!(
            titles,
            vec![
                "Verified MVPs",
                "Verified MVPs: AI Platform",
                "Verified MVPs: AI Platform - Azure AI Services",
                "Ver. MVPs: AI Platform - Azure ML Studio",
                "Verified MVPs: Cloud and Datacenter Management",
                "Ver. MVPs: CDM - Hyper-V",
            ]
        );
    }

    #[test]
    fn flat_naming_mirrors_tree() {
        let flat = resolver().resolve_flat(&mvp_like()).unwrap();
        assert_eq!(flat.key, "mvp");
        assert_eq!(flat.levels.len(), 2);
        assert_eq!(flat.levels[1].sublevels[0].title, "Ver. MVPs: CDM - Hyper-V");
        let json = serde_json::to_value(&flat).unwrap();
        assert_eq!(json["levels"][0]["title"], "Verified MVPs: AI Platform");
    }

    #[test]
    fn resolution_is_deterministic() {
        let module = mvp_like();
        assert_eq!(resolver().resolve(&module), resolver().resolve(&module));
    }
}
