//! Public links to groups.

use serde::Serialize;

/// A group an identity was placed in, as shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupLink {
    pub url: String,
    pub title: String,
}

impl GroupLink {
    pub fn starter_pack(web_base: &str, owner: &str, uri: &str, title: &str) -> Self {
        Self {
            url: format!("{}/starter-pack/{owner}/{}", web_base.trim_end_matches('/'), rkey(uri)),
            title: format!("Starter pack {title}"),
        }
    }

    pub fn list(web_base: &str, owner: &str, uri: &str, title: &str) -> Self {
        Self {
            url: format!("{}/profile/{owner}/lists/{}", web_base.trim_end_matches('/'), rkey(uri)),
            title: format!("List {title}"),
        }
    }

    /// A title with no group behind it yet.
    pub fn unplaced(title: &str) -> Self {
        Self {
            url: String::new(),
            title: title.to_string(),
        }
    }
}

/// Record key: the last path segment of a record URI.
pub fn rkey(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}
