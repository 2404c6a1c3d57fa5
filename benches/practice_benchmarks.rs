use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use recite::engine::diff::highlight;
use recite::engine::grading::grade;
use recite::engine::pool::SentencePool;
use recite::engine::sampler::sample;

fn make_source(count: usize) -> String {
    let words = ["le", "chat", "mange", "une", "souris", "dans", "la", "cuisine"];
    (0..count)
        .map(|i| {
            let sentence: Vec<&str> = (0..6).map(|j| words[(i * 3 + j * 5) % words.len()]).collect();
            format!("{} {i}.", sentence.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_rebuild(c: &mut Criterion) {
    let source = make_source(1000);

    c.bench_function("rebuild pool (1000 sentences)", |b| {
        b.iter(|| SentencePool::rebuild(black_box(&source)))
    });
}

fn bench_sample(c: &mut Criterion) {
    let pool = SentencePool::rebuild(&make_source(1000)).unwrap();

    c.bench_function("sample + grade (1000 sentences)", |b| {
        let mut pool = pool.clone();
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| {
            let i = sample(&mut pool, &mut rng).unwrap();
            let entry = pool.get(i).unwrap().clone();
            let result = grade(black_box("le chat mange"), &entry);
            pool.set_weight(&entry.text, result.updated_weight)
        })
    });
}

fn bench_highlight(c: &mut Criterion) {
    let reference = "Je voudrais réserver une table pour quatre personnes ce soir vers vingt heures";
    let attempt = "Je voudrai reserver un table pour quatres personne se soir vers vingt heure";

    c.bench_function("highlight (sentence with 7 mistakes)", |b| {
        b.iter(|| highlight(black_box(attempt), black_box(reference)))
    });

    let long_reference = make_source(40);
    let long_attempt = long_reference.replace("chat", "chien");
    c.bench_function("highlight (40 sentences)", |b| {
        b.iter(|| highlight(black_box(&long_attempt), black_box(&long_reference)))
    });
}

criterion_group!(benches, bench_rebuild, bench_sample, bench_highlight);
criterion_main!(benches);
