//! Group data types.

use serde::Serialize;

use crate::links::GroupLink;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListPurpose {
    /// Standalone curated list.
    Curation,
    /// Backing list of a starter pack.
    Reference,
}

impl ListPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Curation => "app.bsky.graph.defs#curatelist",
            Self::Reference => "app.bsky.graph.defs#referencelist",
        }
    }

    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "app.bsky.graph.defs#curatelist" => Some(Self::Curation),
            "app.bsky.graph.defs#referencelist" => Some(Self::Reference),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct List {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub purpose: Option<ListPurpose>,
    pub item_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarterPack {
    pub uri: String,
    /// The backing list members are added to.
    pub list_uri: String,
    pub name: String,
    pub description: String,
    /// Kept verbatim so re-issuing the record preserves it.
    pub created_at: String,
}

/// One membership row of a list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
    /// URI of the list-item record; deleting it removes the member.
    pub uri: String,
    pub did: String,
    pub handle: String,
}

/// One page of a cursor-paginated enumeration.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` when the provider has nothing more.
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self { items, cursor: None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedRecord {
    pub uri: String,
    pub cid: String,
}

/// Every group the operator owns, in catalog order.
#[derive(Clone, Debug, Default)]
pub struct Groups {
    pub lists: Vec<List>,
    pub starter_packs: Vec<StarterPack>,
}

impl Groups {
    /// Standalone lists. Starter-pack backing lists carry the same names and
    /// are reached through their packs instead.
    pub fn curated_lists(&self) -> impl Iterator<Item = &List> {
        self.lists
            .iter()
            .filter(|l| l.purpose != Some(ListPurpose::Reference))
    }

    pub fn list_named(&self, title: &str) -> Option<&List> {
        self.curated_lists().find(|l| l.name == title)
    }

    /// Several starter packs may share a name after overflow.
    pub fn starter_packs_named<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a StarterPack> {
        self.starter_packs.iter().filter(move |sp| sp.name == title)
    }
}

/// The groups carrying one title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleGroups {
    pub list: Option<GroupLink>,
    pub starter_packs: Vec<GroupLink>,
}
