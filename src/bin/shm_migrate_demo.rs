use anyhow::Context;
use shm_migrate::prelude::*;

// --- Version 1 layout ---

#[derive(Migratable, Debug, Default, Clone, Copy)]
pub struct OldB {
    pub id: i32,
    pub count: i32,
}

#[derive(Migratable, Debug, Default)]
pub struct OldA {
    pub flag: i32,
    pub items: [OldB; 2],
    pub values: [i32; 3],
}

// --- Version 2 layout ---

#[derive(Migratable, Debug, Default, Clone, Copy)]
pub struct NewB {
    pub id: i32,
    pub status: i32,
    pub count: i32,
}

#[derive(Migratable, Debug, Default)]
pub struct NewA {
    pub flag: i32,
    pub items: [NewB; 3],
    pub values: [i32; 2],
    pub price: f64,
}

fn main() -> anyhow::Result<()> {
    let registry = RegistryBuilder::new()
        .register::<OldA>()?
        .register::<NewA>()?
        .install()
        .context("installing the process-wide registry")?;

    println!("Registered record layouts:");
    println!("{}", registry.schema().to_toml());

    let migrator = Migrator::global()?;
    let plan = migrator.plan::<OldA, NewA>()?;
    println!("Plan:");
    println!("{plan}");

    let old = OldA {
        flag: 1,
        items: [OldB { id: 10, count: 20 }, OldB { id: 11, count: 21 }],
        values: [7, 8, 9],
    };
    let mut new = NewA::default();
    let report = shm_migrate::migrate(&old, &mut new).context("migrating OldA into NewA")?;

    println!("Migrated:");
    println!("  flag = {}", new.flag);
    for (index, item) in new.items.iter().enumerate() {
        println!(
            "  items[{index}] = {{ id: {}, status: {}, count: {} }}",
            item.id, item.status, item.count
        );
    }
    println!("  values = {:?}", new.values);
    println!("  price = {}", new.price);
    println!();

    println!(
        "Report: {} copied, {} converted, {} cast, {} defaulted, {} padded, {} truncated",
        report.copied,
        report.converted,
        report.cast.len(),
        report.defaulted.len(),
        report.padded.len(),
        report.truncated.len()
    );
    for field in &report.defaulted {
        println!("  defaulted {}: {}", field.path, field.reason);
    }
    for array in &report.truncated {
        println!(
            "  truncated {}: {} -> {}",
            array.path, array.source_len, array.target_len
        );
    }

    Ok(())
}
