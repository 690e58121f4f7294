//! # Visibility
//!
//! Who may see and quote a published RFQ.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility of a published RFQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Any registered supplier may quote.
    #[default]
    Public,

    /// No supplier may quote; the buyer is still drafting the shortlist.
    Private,

    /// Only suppliers on the invitation list may quote.
    Invited,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
            Self::Invited => "INVITED",
        };
        write!(f, "{}", s)
    }
}
