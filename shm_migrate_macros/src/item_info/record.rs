use syn::{Field, Ident, Type, ext::IdentExt, spanned::Spanned};

use crate::{
    errors::{AttributeError, MigratableDeriveError},
    util::field_attributes,
};

/// A struct field that ends up in the generated descriptor.
pub struct RecordFieldInfo<'ast> {
    pub ident: &'ast Ident,
    pub ty: &'ast Type,
}

impl<'ast> RecordFieldInfo<'ast> {
    /// Name the field is matched by; `r#type` is matched as `type`.
    pub fn name(&self) -> String {
        self.ident.unraw().to_string()
    }

    /// Reads one field, returning `None` for `#[migrate(skip)]` fields.
    ///
    /// Options may be split across several `#[migrate(..)]` attributes; each
    /// one is checked.
    pub fn from_field(field: &'ast Field) -> Result<Option<Self>, syn::Error> {
        let mut skip = false;
        for attr in field_attributes(field, "migrate") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    let option = meta
                        .path
                        .get_ident()
                        .map(|ident| ident.to_string())
                        .unwrap_or_default();
                    Err(meta.error(AttributeError::UnknownOption(option)))
                }
            })?;
        }

        if skip {
            return Ok(None);
        }

        let Some(ident) = field.ident.as_ref() else {
            return Err(MigratableDeriveError::IncorrectItemType("tuple structs")
                .into_syn(field.span()));
        };

        Ok(Some(Self {
            ident,
            ty: &field.ty,
        }))
    }
}
