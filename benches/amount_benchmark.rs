// ============================================================================
// Amount Engine Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Parsing - Literal text into DecimalValue / Amount
// 2. Rounding - Each rounding mode over fraction and significant targets
// 3. Conversion - Explicit-unit and preference-driven conversion
// ============================================================================

use amount_engine::numeric::{round_to_fraction_digits, round_to_significant_digits};
use amount_engine::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

// ============================================================================
// Parsing Benchmarks
// ============================================================================

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for text in ["42", "123.456", "-0.000012345", "9.99999999999999999e20"] {
        group.bench_with_input(BenchmarkId::new("decimal", text), &text, |b, text| {
            b.iter(|| black_box(text.parse::<DecimalValue>()))
        });
    }

    group.bench_function("amount_with_unit", |b| {
        b.iter(|| black_box("1234.5678[kilometer]".parse::<Amount>()))
    });

    group.finish();
}

// ============================================================================
// Rounding Benchmarks
// ============================================================================

fn benchmark_rounding(c: &mut Criterion) {
    let mut group = c.benchmark_group("rounding");
    let value: DecimalValue = "98765.4321987654321".parse().unwrap();

    for mode in RoundingMode::ALL {
        group.bench_with_input(BenchmarkId::new("fraction_2", mode), &mode, |b, mode| {
            b.iter(|| black_box(round_to_fraction_digits(&value, 2, *mode)))
        });
    }

    // Carry through every kept digit
    let nines: DecimalValue = "99999.99999".parse().unwrap();
    group.bench_function("significant_carry", |b| {
        b.iter(|| black_box(round_to_significant_digits(&nines, 3, RoundingMode::HalfEven)))
    });

    let amount: Amount = "123.456".parse().unwrap();
    let request = WithOptions::new().with_significant_digits(4);
    group.bench_function("amount_with", |b| b.iter(|| black_box(amount.with(&request))));

    group.finish();
}

// ============================================================================
// Conversion Benchmarks
// ============================================================================

fn benchmark_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");
    let engine = ConversionEngineBuilder::cldr_core().build().unwrap();

    let feet: Amount = "1.75[foot]".parse().unwrap();
    let to_inch = ConvertOptions::to_unit("inch");
    group.bench_function("explicit_unit", |b| {
        b.iter(|| black_box(feet.convert_to(&engine, &to_inch)))
    });

    let celsius: Amount = "21.5[celsius]".parse().unwrap();
    let to_fahrenheit = ConvertOptions::to_unit("fahrenheit").with_fraction_digits(1, 1);
    group.bench_function("affine", |b| {
        b.iter(|| black_box(celsius.convert_to(&engine, &to_fahrenheit)))
    });

    let distance: Amount = "5000[meter]".parse().unwrap();
    for locale in ["en-US", "en-GB", "fr-FR"] {
        let options = ConvertOptions::for_locale(locale).with_usage("road");
        group.bench_with_input(BenchmarkId::new("preference", locale), &options, |b, options| {
            b.iter(|| black_box(distance.convert_to(&engine, options)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parsing,
    benchmark_rounding,
    benchmark_conversion
);
criterion_main!(benches);
