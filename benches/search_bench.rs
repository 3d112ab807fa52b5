//! Criterion benchmarks for keyword search and cross-reference parsing.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scripture_index::crossref::CrossRefIndex;
use scripture_index::models::SearchQuery;
use scripture_index::search::search_translation;
use scripture_index::store::Translation;

const WORDS: [&str; 12] = [
    "and", "the", "LORD", "said", "unto", "faith", "love", "earth", "heaven", "light", "people",
    "spirit",
];

fn synthetic_translation(verses: usize) -> Translation {
    let pairs = (0..verses).map(|i| {
        let text: Vec<&str> = (0..20).map(|j| WORDS[(i * 7 + j * 3) % WORDS.len()]).collect();
        (format!("Genesis {}:{}", i / 50 + 1, i % 50 + 1), text.join(" "))
    });
    Translation::from_pairs("BENCH", pairs)
}

fn synthetic_cross_references(lines: usize) -> String {
    let mut text = String::from("From Verse\tTo Verse\tVotes\n");
    for i in 0..lines {
        text.push_str(&format!(
            "Gen.{}.{}\tJohn.{}.{}-John.{}.{}\t{}\n",
            i % 50 + 1,
            i % 31 + 1,
            i % 21 + 1,
            i % 25 + 1,
            i % 21 + 1,
            i % 25 + 2,
            (i * 37) % 500
        ));
    }
    text
}

fn bench_search(c: &mut Criterion) {
    let translation = synthetic_translation(31_000);

    let mut group = c.benchmark_group("keyword_search");

    for term in ["faith", "faith love", "heaven and earth"] {
        let words = SearchQuery::new(term);
        group.bench_with_input(BenchmarkId::new("words", term), &words, |b, q| {
            b.iter(|| search_translation(black_box(&translation), q))
        });

        let phrase = SearchQuery {
            exact_phrase: true,
            ..SearchQuery::new(term)
        };
        group.bench_with_input(BenchmarkId::new("phrase", term), &phrase, |b, q| {
            b.iter(|| search_translation(black_box(&translation), q))
        });
    }

    group.finish();
}

fn bench_cross_reference_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_reference_parse");
    group.sample_size(20);

    for lines in [10_000, 100_000] {
        let text = synthetic_cross_references(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &text, |b, text| {
            b.iter(|| CrossRefIndex::parse(black_box(text)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_search, bench_cross_reference_parse);
criterion_main!(benches);
