use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kotoba_core::lexicon::{Lexicon, SearchKind};
use kotoba_core::romaji::{kana_candidates, romanize};

const ROMAJI: &[(&str, &str)] = &[
    ("short", "ka"),
    ("two", "neko"),
    ("three", "nihon"),
    ("digraph", "kyouto"),
    ("unresolvable", "katakana"),
    ("long", "shashinshashin"),
];

const KANA: &[(&str, &str)] = &[
    ("short", "ねこ"),
    ("youon", "しゃしんきょうと"),
    ("sokuon", "まっちゃとざっし"),
    ("particles", "こんにちはどこへほんを"),
    ("loanword", "パーティーのファイル"),
];

fn bench_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("romaji/reverse");
    for &(label, romaji) in ROMAJI {
        group.bench_with_input(BenchmarkId::new(label, romaji.len()), &romaji, |b, &romaji| {
            b.iter(|| kana_candidates(romaji));
        });
    }
    group.finish();
}

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("romaji/forward");
    for &(label, kana) in KANA {
        group.bench_with_input(BenchmarkId::new(label, kana.len()), &kana, |b, &kana| {
            b.iter(|| romanize(kana));
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut lexicon = Lexicon::open_in_memory().expect("in-memory store");
    let words: Vec<String> = (0..2000)
        .map(|i| {
            let kana = ["ねこ", "にほん", "いぬ", "しゃしん", "きょうと"][i % 5];
            format!(
                r#"{{"id": {i}, "kana": [{{"text": "{kana}{i}", "common": {}}}], "sense": [{{"gloss": [{{"text": "word {i}"}}]}}]}}"#,
                i % 7 == 0
            )
        })
        .collect();
    let document = format!("[{}]", words.join(","));
    lexicon
        .ingest_reader(document.as_bytes(), &Default::default())
        .expect("ingest");

    let mut group = c.benchmark_group("lexicon/search");
    for &(label, romaji) in &ROMAJI[..4] {
        group.bench_with_input(BenchmarkId::new(label, romaji.len()), &romaji, |b, &romaji| {
            b.iter(|| lexicon.search_ids(SearchKind::Romanized, romaji, 10));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reverse, bench_forward, bench_search);
criterion_main!(benches);
