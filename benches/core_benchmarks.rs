use bytes::BytesMut;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scangate::capture::codec::KeyCodec;
use scangate::config::{Config, PrefixMode, PrefixRule, SuffixMode, SuffixRule};
use scangate::engine::evaluator::PolicyEvaluator;
use scangate::engine_core::models::NormalizedCode;
use scangate::engine_core::normalizer;
use tokio_util::codec::Decoder;

fn bench_codec_decode(c: &mut Criterion) {
    let mut codec = KeyCodec;
    let data = b"https://example.com/some/long/path?with=query&and=params\r\n";

    c.bench_function("codec_decode_scan_line", |b| {
        b.iter(|| {
            let mut src = BytesMut::from(&data[..]);
            while let Ok(Some(_)) = codec.decode(black_box(&mut src)) {}
        })
    });
}

fn bench_policy_evaluate(c: &mut Criterion) {
    let config = Config {
        allowlist: (0..50).map(|i| format!("host{}.example.com", i)).collect(),
        blocklist: (0..50).map(|i| format!("bad{}.example.com", i)).collect(),
        ..Config::default()
    };
    let code = NormalizedCode::new("https://host42.example.com/path?q=1");

    c.bench_function("policy_evaluate_allowlisted", |b| {
        b.iter(|| PolicyEvaluator::evaluate(black_box(&code), black_box(&config)))
    });
}

fn bench_normalize(c: &mut Criterion) {
    let prefix = PrefixRule {
        mode: PrefixMode::Default,
        value: None,
    };
    let suffix = SuffixRule {
        mode: SuffixMode::Enter,
        value: None,
    };

    c.bench_function("normalize_default_prefix", |b| {
        b.iter(|| {
            normalizer::normalize(
                black_box("QRCODE:https://example.com/path\r\n"),
                black_box(&prefix),
                black_box(&suffix),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_codec_decode,
    bench_policy_evaluate,
    bench_normalize
);
criterion_main!(benches);
