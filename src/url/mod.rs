//! URL handling: canonicalization and host classification
//!
//! Every URL used as a graph node or set member goes through [`normalize_url`]
//! first, so that trailing-slash and fragment variants collapse to one key.

mod domain;
mod normalize;

pub use domain::{extract_host, is_internal_host};
pub use normalize::{normalize_url, resolve_and_normalize};
