/// Process-wide registry lifecycle
///
/// The global registry can only be installed once per process, so the whole
/// lifecycle runs as a single test in its own binary.
mod common;

use assert_matches::assert_matches;
use common::*;
use shm_migrate::prelude::*;

#[test]
fn test_global_registry_lifecycle() {
    init_logging();

    // Nothing installed yet
    assert_matches!(
        shm_migrate::registry::global(),
        Err(MigrateError::RegistryNotInitialized)
    );
    let mut new = NewA::default();
    assert_matches!(
        shm_migrate::migrate(&sample_old_a(), &mut new),
        Err(MigrateError::RegistryNotInitialized)
    );

    let installed = RegistryBuilder::new()
        .register::<OldA>()
        .and_then(|b| b.register::<NewA>())
        .and_then(RegistryBuilder::install)
        .unwrap();
    assert_eq!(installed.len(), 4);

    // Frozen: a second install is refused and changes nothing
    let err = RegistryBuilder::new()
        .register::<OldB>()
        .and_then(RegistryBuilder::install)
        .unwrap_err();
    assert_eq!(err, MigrateError::RegistryFrozen);
    assert_eq!(shm_migrate::registry::global().unwrap().len(), 4);

    let report = shm_migrate::migrate(&sample_old_a(), &mut new).unwrap();
    assert_eq!(new.items[1], NewB { id: 11, status: 0, count: 21 });
    assert_eq!(new.values, [7, 8]);
    assert_eq!(report.defaulted.len(), 3);

    let plan = Migrator::global().unwrap().plan::<OldA, NewA>().unwrap();
    assert_eq!(plan.fallbacks().count(), 2);
}
