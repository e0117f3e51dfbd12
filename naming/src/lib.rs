//! Module configuration and group naming.
//!
//! A module describes one credential scheme and the category tree it projects
//! onto groups. The [`NamingResolver`] turns that tree into titles and
//! descriptions, shortening titles step by step until they fit the policy
//! bound, and failing loudly when no representation fits.

pub mod error;
pub mod module;
pub mod resolver;

pub use error::{NamingError, NamingLevel};
pub use module::{Category, Module};
pub use resolver::{FlatLevel, FlatNaming, FirstLevel, Naming, NamingNode, NamingResolver};
