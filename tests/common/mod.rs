// Common test fixtures and helpers
#![allow(dead_code)]

use shm_migrate::prelude::*;

/// Initialise logging once per test binary; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// --- Version 1 of the shared segment ---

#[derive(Migratable, Debug, Default, Clone, Copy, PartialEq)]
pub struct OldB {
    pub id: i32,
    pub count: i32,
}

#[derive(Migratable, Debug, Default, Clone, Copy, PartialEq)]
pub struct OldA {
    pub flag: i32,
    pub items: [OldB; 2],
    pub values: [i32; 3],
}

// --- Version 2 of the shared segment ---

#[derive(Migratable, Debug, Default, Clone, Copy, PartialEq)]
pub struct NewB {
    pub id: i32,
    pub status: i32,
    pub count: i32,
}

#[derive(Migratable, Debug, Default, Clone, Copy, PartialEq)]
pub struct NewA {
    pub flag: i32,
    pub items: [NewB; 3],
    pub values: [i32; 2],
    pub price: f64,
}

pub fn sample_old_a() -> OldA {
    OldA {
        flag: 1,
        items: [OldB { id: 10, count: 20 }, OldB { id: 11, count: 21 }],
        values: [7, 8, 9],
    }
}

/// A `NewA` with every field set to a non-zero marker, so tests can tell
/// written fields from untouched ones.
pub fn dirty_new_a() -> NewA {
    NewA {
        flag: -1,
        items: [NewB {
            id: -1,
            status: -1,
            count: -1,
        }; 3],
        values: [-1; 2],
        price: -1.0,
    }
}

pub fn segment_registry() -> MetadataRegistry {
    RegistryBuilder::new()
        .register::<OldA>()
        .and_then(|builder| builder.register::<NewA>())
        .expect("fixture records register")
        .build()
}
