use std::fmt;
use thiserror::Error;

/// Where in the naming tree a title sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamingLevel {
    Root,
    First,
    Second,
}

impl fmt::Display for NamingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Root => "root",
            Self::First => "first level",
            Self::Second => "second level",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    /// No shortening brings the title within the bound. This is a module
    /// configuration error and is never retried.
    #[error("{level} title too long ({len} > {limit}): {title}")]
    TitleTooLong {
        level: NamingLevel,
        title: String,
        len: usize,
        limit: usize,
    },
}
