use crate::models::SkillSet;

/// Normalize a raw skill string into its canonical token
///
/// Leading/trailing whitespace is trimmed and the result is lower-cased.
/// Internal whitespace is left alone. Empty or whitespace-only input is
/// absent (`None`) and never reaches a `SkillSet`.
#[inline]
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Normalize every element, drop absent results and deduplicate
///
/// Used for both candidate-supplied skills and extracted entity spans, so
/// the two sides of the intersection always agree on the token form.
pub fn normalize_set<I, S>(raw: I) -> SkillSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|s| normalize(s.as_ref()))
        .collect()
}

/// Parse a comma-separated skill list as submitted on candidate upload
///
/// `"Python, SQL,,  docker "` -> `{"docker", "python", "sql"}`
pub fn parse_skill_list(raw: &str) -> SkillSet {
    normalize_set(raw.split(','))
}
