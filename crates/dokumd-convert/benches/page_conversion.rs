//! Benchmarks for page conversion performance.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dokumd_convert::{Converter, preserve};

/// Generate a DokuWiki page with the given number of sections.
fn generate_page(sections: usize) -> String {
    let mut page = String::with_capacity(sections * 400);
    page.push_str("====== Benchmark Page ======\n\n");

    for i in 0..sections {
        page.push_str(&format!("===== Section {i} =====\n\n"));
        page.push_str(&format!(
            "Paragraph {i} with **bold**, //italic// and a [[ns:page{i}|link]].\n\n"
        ));
        page.push_str("  * first item\n    * nested item\n\n");
        page.push_str("^ Key ^ Value ^\n| width | <code>300</code> |\n\n");
        page.push_str(&format!("<code rust>\nfn section_{i}() {{}}\n</code>\n\n"));
        page.push_str("<note tip>\nKeep it short.\n</note>\n\n");
        page.push_str(&format!("{{{{media:figure{i}.png?200}}}}\n\n"));
    }
    page
}

fn bench_convert_simple(c: &mut Criterion) {
    let converter = Converter::default();

    c.bench_function("convert_simple_page", |b| {
        b.iter(|| converter.convert("====== Hello ======\n\nSimple content."));
    });
}

fn bench_preserve_blocks(c: &mut Criterion) {
    let page = generate_page(20);

    c.bench_function("preserve_20_sections", |b| {
        b.iter(|| preserve(&page));
    });
}

fn bench_convert_varying_sizes(c: &mut Criterion) {
    let converter = Converter::default();
    let mut group = c.benchmark_group("convert_by_size");

    for sections in [1, 10, 50, 200] {
        let page = generate_page(sections);
        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &page, |b, page| {
            b.iter(|| converter.convert(page));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_convert_simple,
    bench_preserve_blocks,
    bench_convert_varying_sizes
);
criterion_main!(benches);
