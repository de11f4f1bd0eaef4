use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use ebuttd_processor::parse_ebuttd;

const SAMPLE_EBUTTD: &str = include_str!("../tests/test_data/sample.xml");

fn benchmark_parse_ebuttd(c: &mut Criterion) {
    let mut group = c.benchmark_group("EBU-TT-D Parsing");

    group.measurement_time(Duration::from_secs(20));
    group.sample_size(200);

    group.bench_function("parse_sample_document", |b| {
        b.iter(|| {
            let document = parse_ebuttd(black_box(SAMPLE_EBUTTD)).expect("样本解析失败");

            black_box(document);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_parse_ebuttd);

criterion_main!(benches);
