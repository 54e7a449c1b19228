//! Export throughput benchmarks
//!
//! Measures row projection, vector export and raster export over growing row counts.

use cardpress::export::{export_raster, export_vector, RasterJob, VectorJob};
use cardpress::{
    DataRow, FieldId, Layout, LopdfDocumentWriter, PageSizeKey, RasterFormat, RenderSurface,
    SoftwareSurface, ZipArchiveWriter,
};
use cardpress_layout::project;
use cardpress_traits::{CaptureOptions, FieldNode};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tokio::runtime::Runtime;

const FONT: &[u8] = include_bytes!("../tests/fixtures/fonts/Montserrat-Regular.ttf");

fn vocabulary(count: usize) -> Vec<DataRow> {
    (0..count)
        .map(|i| {
            DataRow::new()
                .with("korean", format!("단어 {}", i))
                .with("yomi", format!("dan-eo {}", i))
                .with("meaning", format!("word number {}", i))
                .with("exp", "A longer explanation that has to wrap over several lines of the field box.")
                .with("example", format!("Example sentence for entry {}.", i))
        })
        .collect()
}

fn benchmark_projection(c: &mut Criterion) {
    let layout = Layout::starter();
    let rows = vocabulary(1000);

    let mut group = c.benchmark_group("projection");
    group.throughput(Throughput::Elements(rows.len() as u64));
    group.bench_function("starter_layout_1000_rows", |b| {
        b.iter(|| {
            for row in &rows {
                black_box(project(&layout, Some(row)));
            }
        })
    });
    group.finish();
}

fn benchmark_vector_export(c: &mut Criterion) {
    let layout = Layout::starter();
    let page = PageSizeKey::SixByNine.page_size();

    let mut group = c.benchmark_group("vector_export");
    group.sample_size(20);
    for count in [10usize, 100, 500] {
        let rows = vocabulary(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("pages", count), &rows, |b, rows| {
            b.iter(|| {
                let job = VectorJob {
                    layout: &layout,
                    rows,
                    page,
                    background: None,
                    font: None,
                    line_height: 1.4,
                };
                let export = export_vector::<LopdfDocumentWriter>(&job).expect("export succeeds");
                black_box(export.bytes.len())
            })
        });
    }
    group.finish();
}

fn benchmark_raster_export(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");
    let layout = Layout::starter();
    let page = PageSizeKey::SixByNine.page_size().size();
    let capture = CaptureOptions {
        scale: 0.5,
        ..CaptureOptions::default()
    };

    let mut group = c.benchmark_group("raster_export");
    group.sample_size(10);
    for count in [5usize, 25] {
        let rows = vocabulary(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("png_entries", count), &rows, |b, rows| {
            b.iter(|| {
                let mut surface = SoftwareSurface::from_font_bytes(FONT).expect("font loads");
                let nodes = project(&layout, rows.first()).into_iter().map(FieldNode::from).collect();
                surface.mount(page, nodes);
                let job = RasterJob {
                    layout: &layout,
                    rows,
                    format: RasterFormat::Png,
                    capture,
                };
                let export = rt
                    .block_on(export_raster(&mut surface, ZipArchiveWriter::new(), &job))
                    .expect("export succeeds");
                debug_assert_eq!(surface.field_text(&FieldId::from("korean")), rows[0].get("korean"));
                black_box(export.bytes.len())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_projection,
    benchmark_vector_export,
    benchmark_raster_export
);
criterion_main!(benches);
