//! Text-rewrite rules for query normalization.
//!
//! Each rule is a pure `&str -> String` rewrite backed by a cached
//! regex. Rules never fail: input that matches nothing passes through
//! unchanged. The pipeline order lives in [`super::normalize`]; later
//! rules assume whitespace has already been collapsed by [`squish`].

use crate::utils::config::PLACEHOLDER;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Scalar comparison followed by a quoted string or bare literal token
static COMPARISON_OPERAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s(?:>=|<=|<>|!=|=|>|<)\s)('[^']+'|[$+\-\w.]+)").unwrap()
});

/// `IN (...)` argument list with no nested parentheses
static IN_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\sIN\s)\([^()]+\)").unwrap());

/// `BETWEEN a AND b` with quoted or bare operands
static BETWEEN_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\sBETWEEN\s)('[^']+'|[+\-\w.]+)(\sAND\s)('[^']+'|[+\-\w.]+)").unwrap()
});

/// `VALUES (...)` argument list, greedy to the last closing paren
static VALUES_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\sVALUES\s)\(.+\)").unwrap());

/// Quoted argument of a pattern-matching keyword
static MATCH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\s(?:LIKE|ILIKE|SIMILAR TO|NOT SIMILAR TO)\s)('[^']+')").unwrap()
});

/// Numeric argument of `LIMIT` or `OFFSET`
static LIMIT_OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\s(?:LIMIT|OFFSET)\s)(\d+)").unwrap());

/// Collapse all whitespace runs (including newlines) to single spaces
/// and trim both ends.
pub fn squish(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `id = 5` / `name = 'Bob'` -> `id = xxx` / `name = xxx`
pub fn mask_comparison_operands(sql: &str) -> String {
    COMPARISON_OPERAND
        .replace_all(sql, |caps: &Captures| format!("{}{}", &caps[1], PLACEHOLDER))
        .into_owned()
}

/// `IN (1, 2, 3)` -> `IN (xxx)`
pub fn mask_in_lists(sql: &str) -> String {
    IN_LIST
        .replace_all(sql, |caps: &Captures| {
            format!("{}({})", &caps[1], PLACEHOLDER)
        })
        .into_owned()
}

/// `BETWEEN 18 AND 25` -> `BETWEEN xxx AND xxx`
pub fn mask_between_ranges(sql: &str) -> String {
    BETWEEN_RANGE
        .replace_all(sql, |caps: &Captures| {
            format!("{}{}{}{}", &caps[1], PLACEHOLDER, &caps[3], PLACEHOLDER)
        })
        .into_owned()
}

/// `VALUES (1, 'a'), (2, 'b')` -> `VALUES (xxx)`
pub fn mask_values_lists(sql: &str) -> String {
    VALUES_LIST
        .replace_all(sql, |caps: &Captures| {
            format!("{}({})", &caps[1], PLACEHOLDER)
        })
        .into_owned()
}

/// `LIKE '%foo%'` (also ILIKE / SIMILAR TO / NOT SIMILAR TO) -> `LIKE xxx`
pub fn mask_match_patterns(sql: &str) -> String {
    MATCH_PATTERN
        .replace_all(sql, |caps: &Captures| format!("{}{}", &caps[1], PLACEHOLDER))
        .into_owned()
}

/// `LIMIT 10 OFFSET 20` -> `LIMIT xxx OFFSET xxx`
pub fn mask_limit_offset(sql: &str) -> String {
    LIMIT_OFFSET
        .replace_all(sql, |caps: &Captures| format!("{}{}", &caps[1], PLACEHOLDER))
        .into_owned()
}
