use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::core::normalize::normalize;

/// Set of normalized skill tokens
///
/// Every member went through `normalize`, so there are no empty strings and
/// no duplicates by normalized value. Iteration is sorted, which keeps
/// scoring and serialized output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw skill, normalizing it first. Returns false if the skill
    /// was absent after normalization or already present.
    pub fn insert(&mut self, raw: &str) -> bool {
        match normalize(raw) {
            Some(token) => self.0.insert(token),
            None => false,
        }
    }

    /// Lookup by raw value; the probe is normalized the same way members are.
    pub fn contains(&self, raw: &str) -> bool {
        normalize(raw).is_some_and(|token| self.0.contains(&token))
    }

    /// Skill overlap. Commutative: `a.intersection(&b) == b.intersection(&a)`.
    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        SkillSet(self.0.intersection(&other.0).cloned().collect())
    }

    /// True if at least one token is shared, without allocating the overlap
    pub fn overlaps(&self, other: &SkillSet) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.0.iter().any(|token| large.0.contains(token))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for raw in iter {
            set.insert(raw.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(raw: Vec<String>) -> Self {
        raw.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(set: SkillSet) -> Self {
        set.0.into_iter().collect()
    }
}

/// Candidate skill profile as owned by the candidate repository
///
/// The email is the unique key. Profiles are read-only snapshots for the
/// duration of a match request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub email: String,
    pub name: String,
    pub skills: SkillSet,
    #[serde(rename = "resumeId")]
    pub resume_id: Uuid,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl CandidateProfile {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        skills: SkillSet,
        resume_id: Uuid,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            skills,
            resume_id,
            created_at: None,
        }
    }
}

/// Labeled span produced by an entity extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Stored resume artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeBlob {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_set_normalizes_members() {
        let set: SkillSet = ["  Rust", "rust ", "", "SQL"].into_iter().collect();
        assert_eq!(set.to_vec(), vec!["rust", "sql"]);
    }

    #[test]
    fn test_intersection_is_commutative() {
        let a: SkillSet = ["python", "go", "sql"].into_iter().collect();
        let b: SkillSet = ["sql", "docker", "python"].into_iter().collect();
        assert_eq!(a.intersection(&b), b.intersection(&a));
        assert_eq!(a.intersection(&b).to_vec(), vec!["python", "sql"]);
    }

    #[test]
    fn test_overlaps() {
        let a: SkillSet = ["python"].into_iter().collect();
        let b: SkillSet = ["java"].into_iter().collect();
        let c: SkillSet = ["Java", "kotlin"].into_iter().collect();
        assert!(!a.overlaps(&b));
        assert!(b.overlaps(&c));
        assert!(!a.overlaps(&SkillSet::new()));
    }

    #[test]
    fn test_contains_normalizes_probe() {
        let set: SkillSet = ["Docker"].into_iter().collect();
        assert!(set.contains(" DOCKER "));
        assert!(!set.contains("   "));
    }

    #[test]
    fn test_skill_set_deserializes_through_normalizer() {
        let set: SkillSet = serde_json::from_str(r#"["Go", " go", "", "Rust"]"#).unwrap();
        assert_eq!(set.to_vec(), vec!["go", "rust"]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["go","rust"]"#);
    }
}
