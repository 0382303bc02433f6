// Standalone Rust benchmark for the import paths
//
// Run: cargo bench --bench import_bench
//
// Compares preview (line counting only), a raw matrix read, and the full
// delimited import across:
//   - Clean data (no quotes)
//   - Mixed data (quoted delimiters, escaped quotes, padding)
//   - Various sizes (1K, 10K, 100K rows)

use std::time::{Duration, Instant};

use textmatrix::{
    import_delimited, preview, ColumnDefinition, ColumnParser, DelimitedOptions, PreviewOptions,
    RowDefinition, TextMatrix,
};

/// Generate clean text (no field needs unquoting)
fn generate_clean_text(num_rows: usize, fields_per_row: usize) -> String {
    let header: Vec<String> = (0..fields_per_row).map(|j| format!("col_{}", j)).collect();
    let mut text = header.join(",");
    for i in 0..num_rows {
        text.push('\n');
        let row: Vec<String> = (0..fields_per_row)
            .map(|j| format!("field_{}_{}_value", i, j))
            .collect();
        text.push_str(&row.join(","));
    }
    text
}

/// Generate mixed text (quoted cells, escaped quotes, padded cells)
fn generate_mixed_text(num_rows: usize, fields_per_row: usize) -> String {
    let header: Vec<String> = (0..fields_per_row).map(|j| format!("col_{}", j)).collect();
    let mut text = header.join(",");
    for i in 0..num_rows {
        text.push_str("\r\n");
        let row: Vec<String> = (0..fields_per_row)
            .map(|j| match j % 4 {
                0 => format!("plain_value_{}", i),
                1 => format!("\"has,comma_{}\"", i),
                2 => format!("\"has \"\"quote\"\" {}\"", i),
                _ => format!("  padded_{}_{}  ", i, j),
            })
            .collect();
        text.push_str(&row.join(","));
    }
    text
}

struct BenchResult {
    name: String,
    iterations: u64,
    total_time: Duration,
    input_size: usize,
}

impl BenchResult {
    fn avg_ns(&self) -> f64 {
        self.total_time.as_nanos() as f64 / self.iterations as f64
    }

    fn throughput_mb_s(&self) -> f64 {
        let bytes_per_iter = self.input_size as f64;
        let secs_per_iter = self.avg_ns() / 1_000_000_000.0;
        bytes_per_iter / secs_per_iter / 1_000_000.0
    }
}

fn bench_fn<F: Fn() -> usize>(
    name: &str,
    input_size: usize,
    f: F,
    warmup_secs: f64,
    bench_secs: f64,
) -> BenchResult {
    // Warmup
    let warmup_deadline = Instant::now() + Duration::from_secs_f64(warmup_secs);
    while Instant::now() < warmup_deadline {
        std::hint::black_box(f());
    }

    // Benchmark
    let mut iterations: u64 = 0;
    let start = Instant::now();
    let deadline = start + Duration::from_secs_f64(bench_secs);
    while Instant::now() < deadline {
        std::hint::black_box(f());
        iterations += 1;
    }
    let total_time = start.elapsed();

    BenchResult {
        name: name.to_string(),
        iterations,
        total_time,
        input_size,
    }
}

fn print_results(results: &[BenchResult]) {
    let max_name_len = results.iter().map(|r| r.name.len()).max().unwrap_or(0);

    for r in results {
        println!(
            "  {:<width$}  {:>10.2} µs/iter  {:>8.1} MB/s",
            r.name,
            r.avg_ns() / 1000.0,
            r.throughput_mb_s(),
            width = max_name_len,
        );
    }
}

fn run_benchmark_suite(label: &str, text: &str, warmup: f64, time: f64) {
    let matrix = TextMatrix::new().with_row_definition(
        RowDefinition::new()
            .with_column(ColumnDefinition::new(ColumnParser::single(',')))
            .allow_column_resizing(true),
    );
    let options = DelimitedOptions::default();
    let row_count = preview(text, &PreviewOptions::new()).row_count();

    println!("\n--- {} ---", label);

    let results = vec![
        bench_fn("preview", text.len(), || {
            preview(text, &PreviewOptions::new()).row_count()
        }, warmup, time),
        bench_fn("read_matrix", text.len(), || {
            matrix.read_matrix(text, row_count, 0, false).len()
        }, warmup, time),
        bench_fn("import_delimited", text.len(), || {
            import_delimited(text, &options).map_or(0, |table| table.row_count())
        }, warmup, time),
    ];

    // Verify the paths agree on the row count
    let matrix_rows = matrix.read_matrix(text, row_count, 0, false).len();
    let table_rows = import_delimited(text, &options).map_or(0, |table| table.row_count());
    assert_eq!(matrix_rows, row_count, "matrix row count differs from preview!");
    assert_eq!(table_rows + 1, row_count, "import row count differs from preview!");
    println!("  Input: {} bytes, {} lines (all paths match)", text.len(), row_count);

    print_results(&results);
}

fn main() {
    println!("=== TextMatrix Import Benchmark ===");
    println!("Paths: preview (line count + header), read_matrix (cells), import_delimited (both)");

    let warmup = 1.0;
    let time = 3.0;

    let text = generate_clean_text(1_000, 10);
    run_benchmark_suite("1K rows x 10 fields (clean)", &text, warmup, time);

    let text = generate_clean_text(10_000, 10);
    run_benchmark_suite("10K rows x 10 fields (clean)", &text, warmup, time);

    let text = generate_mixed_text(10_000, 10);
    run_benchmark_suite("10K rows x 10 fields (mixed, CRLF)", &text, warmup, time);

    let text = generate_clean_text(100_000, 10);
    run_benchmark_suite("100K rows x 10 fields (clean)", &text, warmup, time);

    let text = generate_mixed_text(100_000, 10);
    run_benchmark_suite("100K rows x 10 fields (mixed, CRLF)", &text, warmup, time);

    println!("\n=== Done ===");
}
