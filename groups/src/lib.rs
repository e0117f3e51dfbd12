//! Social-graph groups.
//!
//! A group is a List (plain roster) or a StarterPack (a List wrapped in a
//! discovery record, capacity-bounded). The operator account owns every
//! group. Verified identities are placed into the groups whose names equal
//! the titles of their module's naming tree.
//!
//! - [`SocialGraphClient`] is the remote capability, one thin call per
//!   protocol operation. [`XrpcClient`] implements it over HTTP.
//! - [`GroupCatalog`] enumerates the operator's groups, following cursors.
//! - [`MembershipAssigner`] decides placement, creates overflow starter packs,
//!   and undoes placement on removal.

pub mod assigner;
pub mod catalog;
pub mod client;
pub mod error;
pub mod links;
pub mod session;
pub mod types;
pub mod xrpc;

pub use assigner::{MembershipAssigner, ProvisionReport};
pub use catalog::GroupCatalog;
pub use client::SocialGraphClient;
pub use error::GroupError;
pub use links::GroupLink;
pub use session::SessionManager;
pub use types::{CreatedRecord, Groups, List, ListItem, ListPurpose, Page, StarterPack, TitleGroups};
pub use xrpc::{XrpcClient, XrpcConfig};
