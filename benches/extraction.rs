use benefit_graph::config::ColumnRangeConfig;
use benefit_graph::core::{Row, Sheet};
use benefit_graph::{ExplorerConfig, process_sheet, query_neighborhood};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Anchored sheet of `item_count` items, each referencing up to three
/// earlier items through the D..K dependency columns.
fn create_test_sheet(item_count: usize) -> Sheet {
    let mut rows = vec![
        Row::from_fields(&["BENEFIT ITEMS"]),
        Row::from_fields(&["id", "name", "type"]),
    ];
    for i in 0..item_count {
        let mut fields = vec![
            i.to_string(),
            format!("Item {i}"),
            if i % 10 == 0 { "Series" } else { "Item" }.to_string(),
        ];
        for back in 1..=3 {
            if i >= back * 7 {
                fields.push(format!("Ref{back}:Item"));
                fields.push(format!("{}:Ref", i - back * 7));
            }
        }
        rows.push(Row::from_fields(&fields));
    }
    Sheet::new(rows)
}

fn extraction_benchmark(c: &mut Criterion) {
    let config = ExplorerConfig {
        data_start_row: 0,
        primary_range: ColumnRangeConfig::new("D", "I"),
        series_range: ColumnRangeConfig::new("J", "O"),
        filter_by_flags: false,
        ..Default::default()
    };
    let sheet_1k = create_test_sheet(1_000);
    let sheet_10k = create_test_sheet(10_000);

    let mut group = c.benchmark_group("extraction");
    group.sample_size(20);

    group.bench_function("1k_items", |b| {
        b.iter(|| process_sheet(black_box(&sheet_1k), &config))
    });

    group.bench_function("10k_items", |b| {
        b.iter(|| process_sheet(black_box(&sheet_10k), &config))
    });

    group.finish();

    let Ok(output) = process_sheet(&sheet_10k, &config) else {
        return;
    };
    c.bench_function("neighborhood_depth_3", |b| {
        b.iter(|| query_neighborhood(&output.graph, black_box("5000"), 3))
    });
}

criterion_group!(benches, extraction_benchmark);
criterion_main!(benches);
