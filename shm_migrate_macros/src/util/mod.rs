use syn::{Attribute, Data, DeriveInput, Field, Fields, FieldsNamed};

use crate::errors::MigratableDeriveError;

/// The named fields of a plain struct.
pub fn extract_named_fields(input: &DeriveInput) -> Result<&FieldsNamed, MigratableDeriveError> {
    match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(named) => Ok(named),
            Fields::Unnamed(_) => Err(MigratableDeriveError::IncorrectItemType("tuple structs")),
            Fields::Unit => Err(MigratableDeriveError::IncorrectItemType("unit structs")),
        },
        Data::Enum(_) => Err(MigratableDeriveError::IncorrectItemType("enums")),
        Data::Union(_) => Err(MigratableDeriveError::IncorrectItemType("unions")),
    }
}

/// Every attribute on `field` named `attribute`, in source order.
pub fn field_attributes<'a>(
    field: &'a Field,
    attribute: &'a str,
) -> impl Iterator<Item = &'a Attribute> {
    field
        .attrs
        .iter()
        .filter(move |att| att.path().is_ident(attribute))
}
