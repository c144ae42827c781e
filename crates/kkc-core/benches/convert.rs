use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kkc_core::dict::connection::ConnectionMatrix;
use kkc_core::dict::{Token, TrieDictionary};
use kkc_core::ConversionEngine;

const NUM_IDS: u16 = 16;

fn entry(reading: &str, surfaces: &[(&str, i16, u16)]) -> (String, Vec<Token>) {
    (
        reading.to_string(),
        surfaces
            .iter()
            .map(|&(surface, cost, id)| Token {
                surface: surface.to_string(),
                cost,
                left_id: id,
                right_id: id,
            })
            .collect(),
    )
}

fn bench_dict() -> TrieDictionary {
    TrieDictionary::from_entries([
        entry("きょう", &[("今日", 3000, 1), ("京", 5000, 1), ("強", 5200, 1)]),
        entry("は", &[("は", 2000, 2), ("葉", 5000, 1), ("歯", 5100, 1)]),
        entry("いい", &[("良い", 3500, 3), ("いい", 4000, 3)]),
        entry("い", &[("胃", 6000, 1), ("井", 6500, 1)]),
        entry("てんき", &[("天気", 4000, 1), ("転機", 5000, 1)]),
        entry("てん", &[("天", 5000, 1), ("点", 4800, 1)]),
        entry("き", &[("木", 4500, 1), ("気", 4400, 1)]),
        entry("です", &[("です", 2500, 4)]),
        entry("ね", &[("ね", 2000, 5), ("根", 4000, 1)]),
        entry("わたし", &[("私", 3000, 1)]),
        entry("だ", &[("だ", 2500, 4)]),
        entry("と", &[("と", 2000, 2)]),
        entry("おもい", &[("思い", 3500, 6), ("重い", 3600, 3)]),
        entry("おもいます", &[("思います", 3200, 6)]),
        entry("ます", &[("ます", 2500, 4)]),
        entry("がくせい", &[("学生", 4000, 1)]),
        entry("しゅくだい", &[("宿題", 4000, 1)]),
        entry("を", &[("を", 2000, 2)]),
        entry("やる", &[("やる", 3500, 6)]),
        entry("の", &[("の", 2000, 2)]),
        entry("が", &[("が", 2000, 2)]),
        entry("めんどう", &[("面倒", 4500, 1)]),
        entry("くさい", &[("臭い", 5000, 3)]),
        entry("めんどうくさい", &[("面倒くさい", 3800, 3)]),
        entry("けど", &[("けど", 2500, 2)]),
    ])
    .expect("bench dictionary")
}

fn bench_matrix() -> ConnectionMatrix {
    let n = NUM_IDS as usize;
    let costs = (0..n * n)
        .map(|i| if i / n == i % n { 300 } else { ((i * 37) % 200) as i16 })
        .collect();
    ConnectionMatrix::from_costs(NUM_IDS, costs).expect("bench matrix")
}

static INPUTS: &[(&str, &str)] = &[
    ("short", "きょう"),
    ("medium", "きょうはいいてんきですね"),
    ("long", "わたしはきょうはいいてんきだとおもいます"),
];

fn bench_convert(c: &mut Criterion) {
    let engine = ConversionEngine::builder()
        .system(bench_dict())
        .connection(bench_matrix())
        .build()
        .expect("bench engine");
    for k in [1usize, 8, 32] {
        let mut group = c.benchmark_group(format!("convert/k{k}"));
        for &(label, kana) in INPUTS {
            group.bench_with_input(BenchmarkId::new(label, kana.len()), &kana, |b, &kana| {
                b.iter(|| engine.convert(kana, k));
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
