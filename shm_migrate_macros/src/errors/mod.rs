use proc_macro2::Span;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigratableDeriveError {
    #[error("`Migratable` can only be derived for structs with named fields, not {0}")]
    IncorrectItemType(&'static str),
    #[error("`Migratable` cannot be derived for generic structs")]
    GenericRecord,
}

#[derive(Error, Debug)]
pub enum AttributeError {
    #[error("Unknown migrate option `{0}`, expected `skip`")]
    UnknownOption(String),
}

impl MigratableDeriveError {
    pub fn into_syn(self, span: Span) -> syn::Error {
        syn::Error::new(span, self.to_string())
    }
}
