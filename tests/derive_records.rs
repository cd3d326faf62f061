//! `#[derive(Migratable)]` output and nested record handling
use shm_migrate::prelude::*;
use shm_migrate::{MigrateValue, RecordRef};

#[derive(Migratable, Debug, Default, PartialEq)]
struct Header {
    magic: u32,
    r#type: u8,
    #[migrate(skip)]
    cache: u64,
}

#[derive(Migratable, Debug, Default, PartialEq)]
struct HeaderNext {
    r#type: u16,
    magic: u32,
    cache: u64,
}

#[derive(Migratable, Debug, Default, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Migratable, Debug, Default, PartialEq)]
struct Label {
    x: i32,
    text: [u8; 4],
}

#[derive(Migratable, Debug, Default, PartialEq)]
struct ShapeV1 {
    origin: Point,
    corners: [[i16; 2]; 2],
}

#[derive(Migratable, Debug, Default, PartialEq)]
struct ShapeV2 {
    origin: Point,
    corners: [[i32; 3]; 3],
}

#[derive(Migratable, Debug, Default, PartialEq)]
struct ShapeV3 {
    origin: Label,
    corners: [i32; 4],
}

#[test]
fn test_descriptor_lists_fields_in_order() {
    let descriptor = HeaderNext::descriptor();
    let names: Vec<_> = descriptor.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["type", "magic", "cache"]);
    assert_eq!(descriptor.name(), "HeaderNext");
    assert!(std::ptr::eq(descriptor, HeaderNext::descriptor()));
}

#[test]
fn test_skipped_fields_are_left_out() {
    let names: Vec<_> = Header::descriptor()
        .fields()
        .iter()
        .map(|f| f.name())
        .collect();
    assert_eq!(names, vec!["magic", "type"]);
}

#[test]
fn test_skipped_fields_are_neither_read_nor_written() {
    let registry = RegistryBuilder::new()
        .register::<Header>()
        .and_then(|b| b.register::<HeaderNext>())
        .unwrap()
        .build();

    let mut next = HeaderNext::default();
    Migrator::new(&registry)
        .migrate(&Header { magic: 0xfeed, r#type: 3, cache: 77 }, &mut next)
        .unwrap();
    assert_eq!(next, HeaderNext { r#type: 3, magic: 0xfeed, cache: 0 });

    let mut back = Header { magic: 0, r#type: 0, cache: 42 };
    let report = Migrator::new(&registry).migrate(&next, &mut back).unwrap();
    // u16 -> u8 is a cast, `cache` is not described on this side
    assert_eq!(back, Header { magic: 0xfeed, r#type: 3, cache: 42 });
    assert!(report.defaulted.is_empty());
    assert_eq!(report.cast.len(), 1);
    assert_eq!(report.cast[0].path, "type");
}

#[test]
fn test_record_field_kind() {
    assert_eq!(Point::field_kind(), FieldKind::Nested(RecordRef::of::<Point>()));
    assert_ne!(Point::field_kind(), Label::field_kind());
}

#[test]
fn test_nested_arrays_and_records() {
    let registry = RegistryBuilder::new()
        .register::<ShapeV1>()
        .and_then(|b| b.register::<ShapeV2>())
        .unwrap()
        .build();

    let old = ShapeV1 {
        origin: Point { x: 4, y: -4 },
        corners: [[1, 2], [3, 4]],
    };
    let mut new = ShapeV2 {
        origin: Point::default(),
        corners: [[9; 3]; 3],
    };
    let report = Migrator::new(&registry).migrate(&old, &mut new).unwrap();

    assert_eq!(new.origin, Point { x: 4, y: -4 });
    assert_eq!(new.corners, [[1, 2, 0], [3, 4, 0], [0, 0, 0]]);
    assert_eq!(report.padded, vec!["corners[0][2]", "corners[1][2]", "corners[2]"]);
    assert_eq!(report.copied, 2);
    assert_eq!(report.converted, 4);
}

#[test]
fn test_structural_mismatches_are_default_filled() {
    let registry = RegistryBuilder::new()
        .register::<ShapeV1>()
        .and_then(|b| b.register::<ShapeV3>())
        .unwrap()
        .build();

    let old = ShapeV1 {
        origin: Point { x: 4, y: -4 },
        corners: [[1, 2], [3, 4]],
    };
    let mut new = ShapeV3 {
        origin: Label { x: 1, text: *b"abcd" },
        corners: [5; 4],
    };
    let report = Migrator::new(&registry).migrate(&old, &mut new).unwrap();

    // Different but registered records still migrate by name
    assert_eq!(new.origin, Label { x: 4, text: [0; 4] });
    // Array of arrays into array of scalars: each element is a kind mismatch
    assert_eq!(new.corners, [0; 4]);
    assert_eq!(report.defaulted[0].path, "origin.text");
    assert_eq!(report.defaulted[1].path, "corners[0]");
    assert_eq!(
        report.defaulted[1].reason,
        FallbackReason::KindMismatch { from: "array", to: "scalar" }
    );
    assert_eq!(report.truncated.len(), 0);
}

#[test]
fn test_unregistered_nested_records_of_different_types() {
    // ShapeV3, and with it Label, is never registered
    let registry = RegistryBuilder::new()
        .register_descriptor(ShapeV1::descriptor())
        .unwrap()
        .build();
    assert!(registry.is_migratable_type::<Point>());

    let plan = MigrationPlan::between(&registry, ShapeV1::descriptor(), ShapeV3::descriptor());
    let origin = plan.step("origin").and_then(|step| step.fallback());
    assert!(matches!(origin, Some(FallbackReason::UnregisteredRecord { .. })));
}
