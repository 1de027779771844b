pub mod clustered;
pub mod operation;
pub mod submitted;
pub mod variant_type;

/// SS and RS accessions are plain monotonic integers.
pub type Accession = u64;

// re-export for cleaner imports
pub use self::clustered::{ClusteredVariant, ClusteredVariantEntity};
pub use self::operation::{
    AccessionOperation, ClusteredVariantOperation, EventType, SubmittedVariantOperation,
};
pub use self::submitted::{SubmittedVariant, SubmittedVariantEntity};
pub use self::variant_type::VariantType;
