use syn::{spanned::Spanned, visit::Visit};

use crate::{
    errors::MigratableDeriveError, item_info::record::RecordFieldInfo, util::extract_named_fields,
};

/// Collects everything the descriptor generator needs from a derive input.
///
/// Problems are accumulated rather than panicking so that every bad field is
/// reported in one compile.
#[derive(Default)]
pub struct RecordVisitor<'ast> {
    pub fields: Vec<RecordFieldInfo<'ast>>,
    pub errors: Option<syn::Error>,
}

impl<'a> Visit<'a> for RecordVisitor<'a> {
    fn visit_derive_input(&mut self, i: &'a syn::DeriveInput) {
        if !i.generics.params.is_empty() {
            self.push_error(MigratableDeriveError::GenericRecord.into_syn(i.generics.span()));
        }

        match extract_named_fields(i) {
            Ok(named) => {
                for field in &named.named {
                    match RecordFieldInfo::from_field(field) {
                        Ok(Some(info)) => self.fields.push(info),
                        Ok(None) => {}
                        Err(e) => self.push_error(e),
                    }
                }
            }
            Err(e) => self.push_error(e.into_syn(i.ident.span())),
        }
    }
}

impl RecordVisitor<'_> {
    fn push_error(&mut self, error: syn::Error) {
        match &mut self.errors {
            Some(errors) => errors.combine(error),
            None => self.errors = Some(error),
        }
    }
}
