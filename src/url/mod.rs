//! URL handling module for Site-Census
//!
//! This module provides URL normalization, domain extraction, subdomain
//! matching, and the link classifier that sorts every discovered reference
//! into internal, subdomain, external or document-file links.

mod classify;
mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use classify::{classify, LinkClassification, LinkKind, Rejection};
pub use domain::{extract_domain, scope_of, Scope};
pub use matcher::is_subdomain_of;
pub use normalize::{normalize_url, strip_fragment};
