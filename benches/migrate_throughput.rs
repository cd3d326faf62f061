use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use shm_migrate::prelude::*;
use std::hint::black_box;

#[derive(Migratable, Default, Clone, Copy)]
pub struct SensorV1 {
    pub id: u32,
    pub reading: i16,
    pub samples: [i16; 8],
}

#[derive(Migratable, Default, Clone, Copy)]
pub struct SensorV2 {
    pub id: u64,
    pub reading: i32,
    pub samples: [i32; 16],
    pub calibrated: bool,
}

#[derive(Migratable, Default)]
pub struct BankV1 {
    pub epoch: u32,
    pub sensors: [SensorV1; 16],
}

#[derive(Migratable, Default)]
pub struct BankV2 {
    pub epoch: u64,
    pub sensors: [SensorV2; 32],
    pub checksum: u32,
}

fn sample_bank() -> BankV1 {
    let mut bank = BankV1 {
        epoch: 42,
        ..Default::default()
    };
    for (index, sensor) in bank.sensors.iter_mut().enumerate() {
        sensor.id = index as u32;
        sensor.reading = -(index as i16);
        sensor.samples = [index as i16; 8];
    }
    bank
}

fn bench_migrate(c: &mut Criterion) {
    let registry = RegistryBuilder::new()
        .register::<BankV1>()
        .and_then(|builder| builder.register::<BankV2>())
        .map(RegistryBuilder::build)
        .expect("registry builds");

    let mut group = c.benchmark_group("migrate");

    let source = SensorV1 {
        id: 7,
        reading: -3,
        samples: [1; 8],
    };
    group.bench_function("record/sensor", |b| {
        let migrator = Migrator::new(&registry);
        b.iter(|| {
            let mut target = SensorV2::default();
            migrator
                .migrate(black_box(&source), &mut target)
                .expect("sensor migrates");
            black_box(target)
        })
    });

    let bank = sample_bank();
    for (label, options) in [
        ("default", MigrationOptions::default()),
        (
            "reject_fallback",
            MigrationOptions::builder()
                .fallback(FallbackPolicy::Reject)
                .build(),
        ),
    ] {
        group.bench_with_input(BenchmarkId::new("nested/bank", label), &options, |b, options| {
            let migrator = Migrator::with_options(&registry, *options);
            b.iter(|| {
                let mut target = BankV2::default();
                // Rejecting options fail on `calibrated`; the plan check is what is measured.
                let _ = migrator.migrate(black_box(&bank), &mut target);
                black_box(target)
            })
        });
    }

    group.bench_function("plan/bank", |b| {
        let migrator = Migrator::new(&registry);
        b.iter(|| black_box(migrator.plan::<BankV1, BankV2>().expect("both registered")))
    });

    group.finish();
}

criterion_group!(benches, bench_migrate);
criterion_main!(benches);
