use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gu_texture::swizzle::{swizzle, unswizzle};
use gu_texture::{PaletteFormat, PaletteRef, PixelFormat, SourceImage, TextureBuilder};
use std::hint::black_box;

// Helper to generate test data with predictable patterns
fn generate_pixels(len: usize, distinct: usize) -> Vec<u8> {
    (0..len).map(|i| ((i % distinct) * 13 % 256) as u8).collect()
}

fn bench_swizzle(c: &mut Criterion) {
    let mut group = c.benchmark_group("Swizzle");

    // 512x512 RGBA8888
    let pitch = 2048;
    let rows = 512;
    let input = generate_pixels(pitch * rows, 256);
    let mut output = vec![0u8; input.len()];
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("swizzle", |b| {
        b.iter(|| swizzle(black_box(&input), black_box(&mut output), pitch, rows))
    });
    group.bench_function("unswizzle", |b| {
        b.iter(|| unswizzle(black_box(&input), black_box(&mut output), pitch, rows))
    });

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Build Texture");
    let colors: Vec<u8> = (0..=255u8).flat_map(|i| [i, i, i, 0xFF]).collect();
    let palette = PaletteRef::create(PaletteFormat::Rgba8888, 256, Some(&colors)).unwrap();
    let builder = TextureBuilder::default();

    let cases = [
        ("rgba8888 512x512", PixelFormat::Rgba8888, 512u32, 256),
        ("rgba8888 600x600 (decimated)", PixelFormat::Rgba8888, 600, 256),
        ("clut8 512x512", PixelFormat::Clut8, 512, 256),
        ("clut8 512x512 (compacted)", PixelFormat::Clut8, 512, 16),
    ];

    for (name, format, size, distinct) in cases {
        let pixels = generate_pixels(format.row_bytes(size as usize) * size as usize, distinct);
        let source = SourceImage::packed(size, size, format, &pixels);
        let palette = format.is_indexed().then_some(&palette);
        group.throughput(Throughput::Bytes(pixels.len() as u64));

        group.bench_with_input(BenchmarkId::new("build", name), &source, |b, source| {
            b.iter(|| builder.build(black_box(source), palette))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_swizzle, bench_build);
criterion_main!(benches);
