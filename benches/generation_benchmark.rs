use content_columns::scanner::extract_candidates;
use content_columns::{build_engine, ColumnsConfig, Compiler};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Markup with `count` elements cycling through column classes
fn create_markup(count: usize) -> String {
    let classes = [
        "col-count-2", "md:col-count-3", "lg:col-count-4", "col-gap-4", "col-gap-8",
        "col-rule-gray-200", "hover:col-rule-blue-500", "col-rule-dashed", "col-rule-width-2",
        "col-span-all", "col-fill-balance", "col-width-64", "xl:col-width-1/2", "p-4", "flex",
    ];

    let mut content = String::from("<main>\n");
    for i in 0..count {
        let class_list = classes
            .iter()
            .cycle()
            .skip(i % classes.len())
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        content.push_str(&format!("  <div class=\"{}\">Item {}</div>\n", class_list, i));
    }
    content.push_str("</main>\n");
    content
}

fn benchmark_registration(c: &mut Criterion) {
    c.bench_function("register_default_theme", |b| {
        b.iter(|| {
            let engine = build_engine(black_box(ColumnsConfig::default()));
            black_box(engine.len())
        });
    });
}

fn benchmark_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    let engine = build_engine(ColumnsConfig::default());

    for count in [10, 100, 1000] {
        let markup = create_markup(count);

        group.bench_with_input(BenchmarkId::new("scan_and_emit", count), &markup, |b, markup| {
            b.iter(|| {
                let candidates = extract_candidates(black_box(markup));
                Compiler::new(&engine)
                    .with_candidates(candidates)
                    .compile_str("@tailwind utilities;", false)
            });
        });
    }

    group.finish();
}

fn benchmark_apply(c: &mut Criterion) {
    let engine = build_engine(ColumnsConfig::default());
    let source = (0..200)
        .map(|i| {
            format!(
                ".card-{} {{ @apply col-count-2 md:col-count-3 hover:col-rule-gray-{}00 col-gap-4; }}\n",
                i,
                i % 9 + 1
            )
        })
        .collect::<String>();

    c.bench_function("compile_apply_rules", |b| {
        b.iter(|| Compiler::new(&engine).compile_str(black_box(&source), true));
    });
}

criterion_group!(benches, benchmark_registration, benchmark_generation, benchmark_apply);
criterion_main!(benches);
