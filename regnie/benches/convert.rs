use criterion::{black_box, criterion_group, criterion_main, Criterion};
use regnie::{convert, ConvertOptions, GridGeometry, GridIndex, OutputSchema};

const WIDTH: usize = 611;
const HEIGHT: usize = 971;

/// Create a synthetic raster with a value gradient and every 5th cell missing.
fn create_raster() -> Vec<u8> {
    let mut text = String::with_capacity(HEIGHT * (WIDTH * 4 + 1));
    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            let value = if (row + col) % 5 == 0 {
                -999
            } else {
                ((row + col) % 4000) as i32
            };
            text.push_str(&format!("{:4}", value));
        }
        text.push('\n');
    }
    text.into_bytes()
}

fn bench_convert_full(c: &mut Criterion) {
    let raster = create_raster();
    let options = ConvertOptions::default();

    c.bench_function("convert_full_skip_missing", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(32 * 1024 * 1024);
            black_box(convert(black_box(&raster[..]), &mut out, &options).unwrap());
        });
    });
}

fn bench_convert_join(c: &mut Criterion) {
    let raster = create_raster();
    let options = ConvertOptions {
        skip_missing: false,
        schema: OutputSchema::Join,
        ..ConvertOptions::default()
    };

    c.bench_function("convert_join_all", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(16 * 1024 * 1024);
            black_box(convert(black_box(&raster[..]), &mut out, &options).unwrap());
        });
    });
}

fn bench_cell_center(c: &mut Criterion) {
    let geometry = GridGeometry::REGNIE;

    c.bench_function("cell_center_full_grid", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for row in 1..=HEIGHT {
                for column in 1..=WIDTH {
                    let (lat, lon) = geometry.cell_center(GridIndex::new(row, column));
                    acc += lat + lon;
                }
            }
            black_box(acc)
        });
    });
}

criterion_group!(
    benches,
    bench_convert_full,
    bench_convert_join,
    bench_cell_center,
);
criterion_main!(benches);
