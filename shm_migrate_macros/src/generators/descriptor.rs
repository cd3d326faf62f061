use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::item_info::record::RecordFieldInfo;

/// `MigrateValue` and `Migratable` impls for one record.
///
/// The descriptor is built on first use and cached in a function-local
/// static. Field names were already checked unique by the compiler, so the
/// builder's duplicate check cannot fail here.
pub fn generate_migratable_impl(name: &Ident, fields: &[RecordFieldInfo<'_>]) -> TokenStream {
    let record_name = name.to_string();
    let field_calls = fields.iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let field_name = field.name();
        quote! {
            .field::<#ty>(
                #field_name,
                |record| &record.#ident,
                |record| &mut record.#ident,
            )
        }
    });

    quote! {
        impl ::shm_migrate::MigrateValue for #name {
            fn field_kind() -> ::shm_migrate::FieldKind {
                ::shm_migrate::RecordRef::of::<Self>().into()
            }
        }

        impl ::shm_migrate::Migratable for #name {
            fn descriptor() -> &'static ::shm_migrate::StructDescriptor {
                static DESCRIPTOR: ::std::sync::OnceLock<::shm_migrate::StructDescriptor> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    ::shm_migrate::StructDescriptor::builder::<#name>(#record_name)
                        #(#field_calls)*
                        .build()
                        .expect("derived descriptor has unique, well-typed fields")
                })
            }
        }
    }
}
