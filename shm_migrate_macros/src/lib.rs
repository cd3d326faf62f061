use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input, visit::Visit};

use crate::{generators::descriptor::generate_migratable_impl, visitors::record_visitor::RecordVisitor};

mod errors;
mod generators;
mod item_info;
mod util;
mod visitors;

/// Derives `MigrateValue` and `Migratable` for a struct, describing its fields
/// to the `shm_migrate` engine.
///
/// Every field, in declaration order, becomes one entry of the record's
/// `StructDescriptor`, matched by its name. Field types must themselves
/// implement `MigrateValue`: a primitive scalar, a fixed array `[T; N]` of a
/// supported type, or another `Migratable` record. Anything else (references,
/// pointers, `String`, `Vec`, enums) fails to compile at the field.
///
/// # Attributes
///
/// - `#[migrate(skip)]` - **Optional**. Leaves the field out of the descriptor.
///   It is then neither read as a source nor written as a target.
///
/// # Restrictions
///
/// Only non-generic structs with named fields are accepted. Enums, unions,
/// tuple structs and unit structs are rejected with a compile error.
///
/// # Examples
///
/// ```ignore
/// use shm_migrate::prelude::*;
///
/// #[derive(Migratable, Default)]
/// pub struct Entry {
///     pub id: u32,
///     pub counters: [u64; 4],
///     #[migrate(skip)]
///     pub scratch: u8,
/// }
/// // Entry::descriptor() lists `id` and `counters`
/// ```
#[proc_macro_derive(Migratable, attributes(migrate))]
pub fn migratable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let mut visitor = RecordVisitor::default();
    visitor.visit_derive_input(&input);

    if let Some(errors) = visitor.errors {
        return errors.into_compile_error().into();
    }

    generate_migratable_impl(&input.ident, &visitor.fields).into()
}
