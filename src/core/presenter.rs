use crate::core::matcher::Ranking;
use crate::models::{MatchResponse, RankedCandidate, SkillSet};

/// Shape a ranking into the transport-neutral match response
///
/// Ranks are 1-based and follow the ranking order exactly. The required set
/// is returned alongside so callers can show what was matched against.
pub fn present(required: &SkillSet, ranking: &Ranking<'_>) -> MatchResponse {
    let matches = ranking
        .results
        .iter()
        .enumerate()
        .map(|(i, result)| RankedCandidate {
            rank: i + 1,
            name: result.candidate.name.clone(),
            email: result.candidate.email.clone(),
            matched_skills: result.matched_skills.to_vec(),
            matched_count: result.matched_count,
            resume_id: result.candidate.resume_id,
        })
        .collect();

    MatchResponse {
        required_skills: required.to_vec(),
        matches,
        total_candidates: ranking.total_candidates,
    }
}
