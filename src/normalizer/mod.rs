//! Query normalization and fingerprinting.
//!
//! Structurally identical queries differing only in literal parameter
//! values must collapse to the same fingerprint, so aggregation counts
//! query *shapes* rather than individual invocations. Normalization is
//! purely textual; there is no SQL parser behind it.

pub mod rules;

use sha2::{Digest, Sha256};

/// Reduce a raw query to its canonical, parameter-stripped form.
///
/// **Public** - first stage of the tracking pipeline
///
/// The rules run in a fixed order; every rule after [`rules::squish`]
/// assumes whitespace runs have already been collapsed. Re-running
/// `normalize` on its own output is a fixed point.
pub fn normalize(sql: &str) -> String {
    let mut query = rules::squish(sql);
    query = rules::mask_comparison_operands(&query);
    query = rules::mask_in_lists(&query);
    query = rules::mask_between_ranges(&query);
    query = rules::mask_values_lists(&query);
    query = rules::mask_match_patterns(&query);
    query = rules::mask_limit_offset(&query);

    query
}

/// Derive the stable aggregation key for a normalized query.
///
/// **Public** - the aggregator's map key
///
/// The digest is taken over the lowercased text, so normalized queries
/// equal modulo case share a fingerprint. Collisions are accepted as
/// negligible risk.
pub fn fingerprint(normalized_sql: &str) -> String {
    let digest = Sha256::digest(normalized_sql.to_lowercase().as_bytes());
    hex::encode(digest)
}
