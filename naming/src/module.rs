//! Static module configuration.

use badge_types::ModuleKey;
use serde::Serialize;
use std::collections::HashMap;

/// A first-level category and its second-level subcategories, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub subcategories: Vec<String>,
}

impl Category {
    pub fn new<I, S>(name: impl Into<String>, subcategories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            subcategories: subcategories.into_iter().map(Into::into).collect(),
        }
    }
}

/// One supported credential type.
///
/// Loaded at process start and never mutated. Per-identity naming works on a
/// narrowed copy (see [`Module::with_hierarchy`]), never on the original.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Module {
    pub key: ModuleKey,
    pub display_name: String,
    pub short_name: String,
    /// Label value issued to verified identities.
    pub label: String,
    /// Tells the user what the verification ID is and where to find it.
    pub explanation_text: String,
    pub hierarchy: Vec<Category>,
    /// Shorter spellings of first-level category names.
    pub level1_translations: HashMap<String, String>,
    /// Shorter spellings of second-level category names.
    pub level2_translations: HashMap<String, String>,
}

impl Module {
    pub fn new(
        key: ModuleKey,
        display_name: impl Into<String>,
        short_name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            short_name: short_name.into(),
            label: label.into(),
            explanation_text: String::new(),
            hierarchy: Vec::new(),
            level1_translations: HashMap::new(),
            level2_translations: HashMap::new(),
        }
    }

    pub fn explanation(mut self, text: impl Into<String>) -> Self {
        self.explanation_text = text.into();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.hierarchy.push(category);
        self
    }

    pub fn level1_translation(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.level1_translations.insert(from.into(), to.into());
        self
    }

    pub fn level2_translation(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.level2_translations.insert(from.into(), to.into());
        self
    }

    /// A copy of this module with its category tree replaced.
    ///
    /// Used when only some categories apply to one identity (an MVP is awarded
    /// in a few categories, an Oracle ACE holds exactly one level).
    pub fn with_hierarchy(&self, hierarchy: Vec<Category>) -> Self {
        Self {
            hierarchy,
            ..self.clone()
        }
    }

    /// Keep only the categories and subcategories named in `selected`.
    ///
    /// Names that are not part of the module's hierarchy are ignored, so the
    /// result is always a subtree of the configured one.
    pub fn narrowed(&self, selected: &[(String, Vec<String>)]) -> Self {
        let hierarchy = self
            .hierarchy
            .iter()
            .filter_map(|category| {
                let (_, subs) = selected.iter().find(|(name, _)| *name == category.name)?;
                let subcategories = category
                    .subcategories
                    .iter()
                    .filter(|s| subs.contains(s))
                    .cloned()
                    .collect();
                Some(Category {
                    name: category.name.clone(),
                    subcategories,
                })
            })
            .collect();
        self.with_hierarchy(hierarchy)
    }
}
