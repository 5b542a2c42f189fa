// Criterion benchmarks for Skill Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skill_match::core::{normalize_set, LabelAllowList, Matcher};
use skill_match::models::{CandidateProfile, SkillSet};
use std::time::Duration;
use uuid::Uuid;

const SKILLS: &[&str] = &[
    "python", "java", "go", "rust", "sql", "docker", "kubernetes", "aws", "react",
    "kafka", "spark", "terraform", "postgresql", "redis", "django", "spring",
];

fn create_candidate(id: usize) -> CandidateProfile {
    let skills: SkillSet = SKILLS
        .iter()
        .enumerate()
        .filter(|(j, _)| (id + j * 5) % 4 == 0)
        .map(|(_, s)| *s)
        .collect();

    CandidateProfile::new(
        format!("candidate{}@example.com", id),
        format!("Candidate {}", id),
        skills,
        Uuid::new_v4(),
    )
}

fn required() -> SkillSet {
    normalize_set(["Python", "SQL", "Docker", "AWS", "Kafka"])
}

fn bench_normalize(c: &mut Criterion) {
    let raw: Vec<String> = SKILLS.iter().map(|s| format!("  {} ", s.to_uppercase())).collect();
    c.bench_function("normalize_set_16", |b| {
        b.iter(|| normalize_set(black_box(&raw)));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let sequential = Matcher::new(LabelAllowList::default(), Duration::from_secs(5), usize::MAX);
    let sharded = Matcher::new(LabelAllowList::default(), Duration::from_secs(5), 1000);
    let required = required();

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [100, 1_000, 10_000, 50_000].iter() {
        let candidates: Vec<CandidateProfile> =
            (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("sequential", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    sequential
                        .rank_sequential(black_box(&required), black_box(&candidates))
                        .len()
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("sharded", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    sharded
                        .rank_sharded(black_box(&required), black_box(&candidates))
                        .len()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_ranking);

criterion_main!(benches);
