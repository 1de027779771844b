use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    #[error("Can't classify variant with reference '{reference}' and alternate '{alternate}'")]
    Unclassifiable {
        reference: String,
        alternate: String,
    },
}
