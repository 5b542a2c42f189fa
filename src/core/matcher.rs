use rayon::prelude::*;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;
use thiserror::Error;

use crate::core::extractor::{EntityExtractor, ExtractionError, LabelAllowList};
use crate::core::normalize::normalize_set;
use crate::models::{CandidateProfile, SkillSet};

/// Errors that fail a match request outright
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Entity extraction unavailable: {0}")]
    ExtractionUnavailable(String),

    #[error("Candidate repository unavailable: {0}")]
    RepositoryUnavailable(String),
}

impl From<ExtractionError> for MatchError {
    fn from(err: ExtractionError) -> Self {
        MatchError::ExtractionUnavailable(err.to_string())
    }
}

/// One candidate's overlap with the required skills
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub candidate: &'a CandidateProfile,
    pub matched_skills: SkillSet,
    pub matched_count: usize,
    /// Position of the candidate in the scanned sequence; breaks count ties
    pub input_index: usize,
}

/// Ranked output of the matching process
#[derive(Debug, Default)]
pub struct Ranking<'a> {
    pub results: Vec<MatchResult<'a>>,
    pub total_candidates: usize,
}

impl Ranking<'_> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_SHARD_SIZE: usize = 5000;

/// Skill-overlap matcher
///
/// # Pipeline
/// 1. Extract entity spans from the job description
/// 2. Keep spans whose label is on the allow-list and normalize them
/// 3. Intersect every candidate's skills with the required set
/// 4. Drop zero-overlap candidates and sort by matched count, stable on input order
#[derive(Debug, Clone)]
pub struct Matcher {
    labels: LabelAllowList,
    extraction_timeout: Duration,
    shard_size: usize,
}

impl Matcher {
    pub fn new(labels: LabelAllowList, extraction_timeout: Duration, shard_size: usize) -> Self {
        Self {
            labels,
            extraction_timeout,
            shard_size: shard_size.max(1),
        }
    }

    pub fn with_default_labels() -> Self {
        Self::new(
            LabelAllowList::default(),
            DEFAULT_EXTRACTION_TIMEOUT,
            DEFAULT_SHARD_SIZE,
        )
    }

    /// Derive the required skill set for a job description
    ///
    /// Blank descriptions short-circuit to an empty set without calling the
    /// extractor. Extractor failure or timeout fails the whole request.
    pub async fn derive_required_skills(
        &self,
        extractor: &dyn EntityExtractor,
        job_description: &str,
    ) -> Result<SkillSet, MatchError> {
        if job_description.trim().is_empty() {
            return Ok(SkillSet::new());
        }

        let spans = match tokio::time::timeout(
            self.extraction_timeout,
            extractor.extract_entities(job_description),
        )
        .await
        {
            Ok(Ok(spans)) => spans,
            Ok(Err(e)) => {
                tracing::error!("Extractor {} failed: {}", extractor.name(), e);
                return Err(e.into());
            }
            Err(_) => {
                let e = ExtractionError::Timeout(self.extraction_timeout);
                tracing::error!("Extractor {} failed: {}", extractor.name(), e);
                return Err(e.into());
            }
        };

        let total_spans = spans.len();
        let required = normalize_set(
            spans
                .iter()
                .filter(|span| self.labels.accepts(&span.label))
                .map(|span| span.text.as_str()),
        );

        tracing::debug!(
            "Extractor {} returned {} spans, {} required skills",
            extractor.name(),
            total_spans,
            required.len()
        );

        Ok(required)
    }

    /// Rank candidates by skill overlap
    ///
    /// An empty required set yields an empty ranking: nothing was asked for,
    /// so nobody matches. Large collections are scored in parallel shards;
    /// the result is identical to the sequential path.
    pub fn rank_candidates<'a>(
        &self,
        required: &SkillSet,
        candidates: &'a [CandidateProfile],
    ) -> Ranking<'a> {
        if candidates.len() > self.shard_size {
            self.rank_sharded(required, candidates)
        } else {
            self.rank_sequential(required, candidates)
        }
    }

    pub fn rank_sequential<'a>(
        &self,
        required: &SkillSet,
        candidates: &'a [CandidateProfile],
    ) -> Ranking<'a> {
        let total_candidates = candidates.len();
        if required.is_empty() {
            return Ranking {
                results: Vec::new(),
                total_candidates,
            };
        }

        let results = score_shard(required, candidates, 0);

        Ranking {
            results,
            total_candidates,
        }
    }

    pub fn rank_sharded<'a>(
        &self,
        required: &SkillSet,
        candidates: &'a [CandidateProfile],
    ) -> Ranking<'a> {
        let total_candidates = candidates.len();
        if required.is_empty() {
            return Ranking {
                results: Vec::new(),
                total_candidates,
            };
        }

        let shard_size = self.shard_size;
        let shards: Vec<Vec<MatchResult<'a>>> = candidates
            .par_chunks(shard_size)
            .enumerate()
            .map(|(i, shard)| score_shard(required, shard, i * shard_size))
            .collect();

        tracing::debug!(
            "Scored {} candidates in {} shards",
            total_candidates,
            shards.len()
        );

        Ranking {
            results: merge_ranked(shards),
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_labels()
    }
}

/// Global ranking order: matched count descending, then input position
#[inline]
pub fn compare_results(a: &MatchResult<'_>, b: &MatchResult<'_>) -> Ordering {
    b.matched_count
        .cmp(&a.matched_count)
        .then_with(|| a.input_index.cmp(&b.input_index))
}

fn score_shard<'a>(
    required: &SkillSet,
    shard: &'a [CandidateProfile],
    offset: usize,
) -> Vec<MatchResult<'a>> {
    let mut results: Vec<MatchResult<'a>> = shard
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.skills.overlaps(required))
        .filter_map(|(i, candidate)| {
            let matched_skills = candidate.skills.intersection(required);
            let matched_count = matched_skills.len();
            (matched_count > 0).then_some(MatchResult {
                candidate,
                matched_skills,
                matched_count,
                input_index: offset + i,
            })
        })
        .collect();

    // sort_by is stable; the index tie-break makes that explicit
    results.sort_by(compare_results);
    results
}

/// Merge individually ranked shards into one globally ranked list
///
/// Each shard must already be sorted by `compare_results`. Shards are not
/// concatenated: a k-way merge under the same comparator keeps the order
/// identical to ranking the whole sequence at once.
pub fn merge_ranked<'a>(shards: Vec<Vec<MatchResult<'a>>>) -> Vec<MatchResult<'a>> {
    let total: usize = shards.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);

    let mut iters: Vec<_> = shards.into_iter().map(|s| s.into_iter().peekable()).collect();
    let mut heap = BinaryHeap::with_capacity(iters.len());

    for (shard, iter) in iters.iter_mut().enumerate() {
        if let Some(head) = iter.peek() {
            heap.push(Reverse((Reverse(head.matched_count), head.input_index, shard)));
        }
    }

    while let Some(Reverse((_, _, shard))) = heap.pop() {
        let iter = &mut iters[shard];
        if let Some(result) = iter.next() {
            merged.push(result);
        }
        if let Some(head) = iter.peek() {
            heap.push(Reverse((Reverse(head.matched_count), head.input_index, shard)));
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::ExtractionError;
    use crate::models::EntitySpan;
    use async_trait::async_trait;
    use uuid::Uuid;

    fn candidate(email: &str, skills: &[&str]) -> CandidateProfile {
        CandidateProfile::new(
            email,
            format!("Candidate {}", email),
            skills.iter().collect(),
            Uuid::new_v4(),
        )
    }

    fn required(skills: &[&str]) -> SkillSet {
        skills.iter().collect()
    }

    fn emails(ranking: &Ranking<'_>) -> Vec<String> {
        ranking
            .results
            .iter()
            .map(|r| r.candidate.email.clone())
            .collect()
    }

    struct FixedExtractor(Vec<EntitySpan>);

    #[async_trait]
    impl EntityExtractor for FixedExtractor {
        async fn extract_entities(&self, _text: &str) -> Result<Vec<EntitySpan>, ExtractionError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingExtractor;

    #[async_trait]
    impl EntityExtractor for FailingExtractor {
        async fn extract_entities(&self, _text: &str) -> Result<Vec<EntitySpan>, ExtractionError> {
            Err(ExtractionError::ApiError("model not loaded".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct SlowExtractor;

    #[async_trait]
    impl EntityExtractor for SlowExtractor {
        async fn extract_entities(&self, _text: &str) -> Result<Vec<EntitySpan>, ExtractionError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![])
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[test]
    fn test_end_to_end_ranking() {
        let matcher = Matcher::with_default_labels();
        let candidates = vec![
            candidate("a", &["python", "go"]),
            candidate("b", &["python", "sql", "docker"]),
            candidate("c", &["sql"]),
        ];

        let ranking = matcher.rank_candidates(&required(&["python", "sql"]), &candidates);

        assert_eq!(emails(&ranking), vec!["b", "a", "c"]);
        assert_eq!(ranking.results[0].matched_count, 2);
        assert_eq!(ranking.results[0].matched_skills.to_vec(), vec!["python", "sql"]);
        assert_eq!(ranking.results[1].matched_count, 1);
        assert_eq!(ranking.results[2].matched_count, 1);
        assert_eq!(ranking.total_candidates, 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matcher = Matcher::with_default_labels();
        let candidates = vec![
            candidate("c1", &["a", "b"]),
            candidate("c2", &["a", "b"]),
            candidate("c3", &["a", "b", "c"]),
        ];

        let ranking = matcher.rank_candidates(&required(&["a", "b", "c"]), &candidates);

        assert_eq!(emails(&ranking), vec!["c3", "c1", "c2"]);
    }

    #[test]
    fn test_no_false_positives() {
        let matcher = Matcher::with_default_labels();
        let candidates = vec![candidate("py", &["python"])];

        let ranking = matcher.rank_candidates(&required(&["java"]), &candidates);

        assert!(ranking.is_empty());
        assert_eq!(ranking.total_candidates, 1);
    }

    #[test]
    fn test_empty_required_returns_empty() {
        let matcher = Matcher::with_default_labels();
        let candidates = vec![candidate("a", &["python"]), candidate("b", &["go"])];

        let first = matcher.rank_candidates(&SkillSet::new(), &candidates);
        let second = matcher.rank_candidates(&SkillSet::new(), &candidates);

        assert!(first.is_empty());
        assert!(second.is_empty());
        assert_eq!(first.total_candidates, 2);
    }

    #[test]
    fn test_sharded_matches_sequential() {
        let matcher = Matcher::new(LabelAllowList::default(), DEFAULT_EXTRACTION_TIMEOUT, 3);
        let pool = ["rust", "go", "sql", "docker", "python"];
        let candidates: Vec<CandidateProfile> = (0..40)
            .map(|i| {
                let skills: Vec<&str> = pool
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| (i * 7 + j * 3) % 4 != 0)
                    .map(|(_, s)| *s)
                    .take(1 + i % 5)
                    .collect();
                candidate(&format!("c{}", i), &skills)
            })
            .collect();
        let req = required(&["rust", "sql", "python"]);

        let sequential = matcher.rank_sequential(&req, &candidates);
        let sharded = matcher.rank_sharded(&req, &candidates);

        assert_eq!(emails(&sequential), emails(&sharded));
        assert!(!sequential.is_empty());
    }

    #[test]
    fn test_merge_ranked_interleaves_shards() {
        let candidates = vec![
            candidate("0", &["a"]),
            candidate("1", &["a", "b"]),
            candidate("2", &["a", "b"]),
            candidate("3", &["a"]),
        ];
        let req = required(&["a", "b"]);
        let first = score_shard(&req, &candidates[..2], 0);
        let second = score_shard(&req, &candidates[2..], 2);

        let merged = merge_ranked(vec![first, second]);
        let order: Vec<&str> = merged.iter().map(|r| r.candidate.email.as_str()).collect();

        assert_eq!(order, vec!["1", "2", "0", "3"]);
    }

    #[tokio::test]
    async fn test_derive_filters_labels_and_normalizes() {
        let matcher = Matcher::with_default_labels();
        let extractor = FixedExtractor(vec![
            EntitySpan::new("Python", "TECH"),
            EntitySpan::new(" python ", "ORG"),
            EntitySpan::new("Berlin", "GPE"),
            EntitySpan::new("PostgreSQL", "TECHNOLOGY"),
            EntitySpan::new("   ", "TECH"),
        ]);

        let required = matcher
            .derive_required_skills(&extractor, "Python and PostgreSQL in Berlin")
            .await
            .unwrap();

        assert_eq!(required.to_vec(), vec!["postgresql", "python"]);
    }

    #[tokio::test]
    async fn test_derive_blank_description_skips_extractor() {
        let matcher = Matcher::with_default_labels();
        let required = matcher
            .derive_required_skills(&FailingExtractor, "   ")
            .await
            .unwrap();
        assert!(required.is_empty());
    }

    #[tokio::test]
    async fn test_derive_extractor_failure_is_fatal() {
        let matcher = Matcher::with_default_labels();
        let err = matcher
            .derive_required_skills(&FailingExtractor, "Rust engineer")
            .await
            .unwrap_err();
        assert!(matches!(err, MatchError::ExtractionUnavailable(_)));
    }

    #[tokio::test]
    async fn test_derive_timeout_is_fatal() {
        let matcher = Matcher::new(
            LabelAllowList::default(),
            Duration::from_millis(50),
            DEFAULT_SHARD_SIZE,
        );
        let err = matcher
            .derive_required_skills(&SlowExtractor, "Rust engineer")
            .await
            .unwrap_err();

        let expected = ExtractionError::Timeout(Duration::from_millis(50)).to_string();
        match err {
            MatchError::ExtractionUnavailable(message) => assert_eq!(message, expected),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
