use chrono::Month;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flight_delays::selection::DayOfMonth;
use flight_delays::{
    delay_hours_by_type, delay_type_proportions, monthly_occurrences, top_destinations,
    CarrierFilter, Dataset, DelayCategory, FlightDelayRecord,
};

const CARRIERS: &[&str] = &["WN", "AA", "MQ", "UA", "OO", "DL", "XE", "CO", "US", "EV"];
const AIRPORTS: &[&str] = &[
    "ORD", "ATL", "DFW", "DEN", "LAX", "EWR", "IAH", "SFO", "PHX", "LAS", "MSP", "DTW", "BOS",
    "SEA", "CLT", "JFK", "MCO", "SLC", "PHL", "BWI",
];

/// Deterministic synthetic table, roughly the shape of one year of delay records
fn synthetic_dataset(rows: usize) -> Dataset {
    let records: Vec<FlightDelayRecord> = (0..rows)
        .map(|i| {
            FlightDelayRecord::new(
                (i % 12) as u32 + 1,
                (i % 31) as u32 + 1,
                CARRIERS[i % CARRIERS.len()],
                AIRPORTS[(i * 7) % AIRPORTS.len()],
            )
            .with_delay(DelayCategory::CarrierDelay, (i % 90) as f64)
            .with_delay(DelayCategory::WeatherDelay, (i % 13) as f64)
            .with_delay(DelayCategory::NasDelay, (i % 41) as f64)
            .with_delay(DelayCategory::LateAircraftDelay, (i % 67) as f64)
        })
        .collect();
    Dataset::from_records(&records).unwrap()
}

fn benchmark_delay_queries(c: &mut Criterion) {
    let dataset = synthetic_dataset(500_000);
    let day = DayOfMonth::new(5).unwrap();
    let aa = CarrierFilter::code("AA");

    c.bench_function("delay_hours_by_type", |b| {
        b.iter(|| delay_hours_by_type(black_box(&dataset), Month::January, day, &aa).unwrap())
    });

    c.bench_function("delay_type_proportions", |b| {
        b.iter(|| delay_type_proportions(black_box(&dataset), Month::January, day, &aa).unwrap())
    });

    c.bench_function("monthly_occurrences_all", |b| {
        b.iter(|| monthly_occurrences(black_box(&dataset), &CarrierFilter::All).unwrap())
    });

    c.bench_function("top_destinations", |b| {
        b.iter(|| top_destinations(black_box(&dataset), Month::January, &aa, 10).unwrap())
    });
}

criterion_group!(benches, benchmark_delay_queries);
criterion_main!(benches);
