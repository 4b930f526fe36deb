use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use lexdrill::engine::{MinimumTierPolicy, SelectionPolicy, WeightedPolicy, matches_any};
use lexdrill::session::{EducationEvent, EducationSession, EducationSettings};
use lexdrill::sets::{Word, WordSet, combine};
use lexdrill::store::schema::ProgressMap;

fn make_words(count: usize) -> Vec<Word> {
    (0..count)
        .map(|i| {
            let id = format!("w{i}");
            Word::new(id.clone(), format!("hint {i}"), &["відповідь"]).with_counter((i % 25) as u32)
        })
        .collect()
}

fn make_sets(sets: usize, words: usize) -> Vec<WordSet> {
    (0..sets)
        .map(|s| {
            let id = format!("{s:08}-0000-4000-8000-000000000000");
            let words = (0..words)
                .map(|i| Word::new(format!("s{s}w{i}"), format!("hint {i}"), &["так"]))
                .collect();
            WordSet::new(id, format!("Set {s}"), words)
        })
        .collect()
}

fn bench_policies(c: &mut Criterion) {
    let pool = make_words(500);
    let weighted = WeightedPolicy;
    let minimum = MinimumTierPolicy::default();

    c.bench_function("weighted select (500 words)", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| weighted.select(black_box(&pool), &mut rng).map(|w| w.id.len()))
    });

    c.bench_function("minimum tier select (500 words)", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| minimum.select(black_box(&pool), &mut rng).map(|w| w.id.len()))
    });
}

fn bench_answer_matching(c: &mut Criterion) {
    let answers = vec![
        "Нью-Йорк".to_string(),
        "New York".to_string(),
        "велике яблуко".to_string(),
    ];

    c.bench_function("matches_any (3 answers)", |b| {
        b.iter(|| matches_any(black_box("  new-york "), black_box(&answers)))
    });
}

fn bench_session_answers(c: &mut Criterion) {
    let set = WordSet::new("bench", "Bench", make_words(200));
    let stored = ProgressMap::new();

    c.bench_function("education session 100 answers (200 words)", |b| {
        b.iter(|| {
            let mut session = EducationSession::new(
                &set,
                &stored,
                Default::default(),
                None,
                EducationSettings::default(),
                Box::new(WeightedPolicy),
                Box::new(SmallRng::seed_from_u64(3)),
            );
            for i in 0..100 {
                let input = if i % 4 == 0 { "ні" } else { "відповідь" };
                session.apply(EducationEvent::Submit(input.to_string()));
            }
            session.answer_count()
        })
    });
}

fn bench_combine(c: &mut Criterion) {
    let sets = make_sets(20, 100);
    let ids: Vec<String> = sets.iter().map(|s| s.id.clone()).collect();

    c.bench_function("combine 20 sets (2000 words)", |b| {
        b.iter(|| combine(black_box(&sets), black_box(&ids)).map(|s| s.words.len()))
    });
}

criterion_group!(
    benches,
    bench_policies,
    bench_answer_matching,
    bench_session_answers,
    bench_combine
);
criterion_main!(benches);
