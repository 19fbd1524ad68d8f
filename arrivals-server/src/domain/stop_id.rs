//! Stop identifier reconciliation.
//!
//! The same physical stop is tagged differently depending on who published
//! the data: a long coded identifier (e.g. `490008660N` or `0100BRP90312`),
//! an 8-character public short code, or either of those embedded in a
//! feed-specific reference with a prefix. Matching is therefore heuristic.

/// Length of the short public code used by the suffix heuristics.
const SHORT_CODE_LEN: usize = 8;

/// Minimum length of a suffix slice before it is trusted for substring matching.
const MIN_SUFFIX_MATCH_LEN: usize = 6;

/// Normalise a stop identifier for comparison: strip all whitespace and uppercase.
pub fn normalize_stop_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Returns true if `candidate_ref` refers to the same stop as any of `target_ids`.
///
/// Each target is compared in turn using, in order:
/// 1. exact equality after normalisation
/// 2. containment in either direction
/// 3. equal last-8-character suffixes when both sides are at least 8 long
/// 4. the target's last 8 characters (or the whole target when shorter)
///    appearing anywhere inside the candidate, if that slice is at least 6 long
///
/// Empty identifiers never match anything.
pub fn is_matching_stop_id<T: AsRef<str>>(candidate_ref: &str, target_ids: &[T]) -> bool {
    let candidate = normalize_stop_id(candidate_ref);
    if candidate.is_empty() {
        return false;
    }

    target_ids
        .iter()
        .map(|t| normalize_stop_id(t.as_ref()))
        .any(|target| normalized_ids_match(&candidate, &target))
}

/// Compare two already-normalised identifiers.
fn normalized_ids_match(candidate: &str, target: &str) -> bool {
    if target.is_empty() {
        return false;
    }

    if candidate == target {
        return true;
    }

    if candidate.contains(target) || target.contains(candidate) {
        return true;
    }

    let candidate_suffix = suffix(candidate, SHORT_CODE_LEN);
    let target_suffix = suffix(target, SHORT_CODE_LEN);

    if candidate.chars().count() >= SHORT_CODE_LEN
        && target.chars().count() >= SHORT_CODE_LEN
        && candidate_suffix == target_suffix
    {
        return true;
    }

    target_suffix.chars().count() >= MIN_SUFFIX_MATCH_LEN && candidate.contains(target_suffix)
}

/// The last `n` characters of `s`, or all of `s` if it is shorter.
fn suffix(s: &str, n: usize) -> &str {
    let len = s.chars().count();
    if len <= n {
        return s;
    }
    let start = s
        .char_indices()
        .nth(len - n)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &s[start..]
}

/// The set of equivalent identifiers known to refer to one physical stop.
///
/// Built from the identifier the caller asked about, the stop's public short
/// code and its canonical identifier. Trying every alias improves recall
/// because upstream feeds are inconsistent about which form they embed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopAliases {
    ids: Vec<String>,
}

impl StopAliases {
    /// Build an alias set, dropping blanks and duplicates (after normalisation)
    /// while preserving first-seen order.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for id in ids {
            let id = normalize_stop_id(id.as_ref());
            if !id.is_empty() && !normalized.contains(&id) {
                normalized.push(id);
            }
        }
        Self { ids: normalized }
    }

    /// Returns true if `candidate_ref` matches any alias.
    pub fn matches(&self, candidate_ref: &str) -> bool {
        is_matching_stop_id(candidate_ref, &self.ids)
    }

    /// The normalised aliases, in priority order.
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
