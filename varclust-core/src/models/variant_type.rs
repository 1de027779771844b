use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::consts::NUCLEOTIDES;
use crate::errors::VariantError;

///
/// Variant class of a clustered variant. Part of the RS identity: two
/// submitted variants at the same position but of a different class never
/// share an RS.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantType {
    Snv,
    Mnv,
    Ins,
    Del,
    Indel,
    NoSequenceAlteration,
    SequenceAlteration,
}

impl VariantType {
    ///
    /// Classify a variant from its alleles.
    ///
    /// # Arguments
    /// * `reference` - reference allele, may be empty for insertions
    /// * `alternate` - alternate allele, may be empty for deletions
    ///
    /// # Returns
    /// * the variant class, or `VariantError::Unclassifiable` for symbolic
    ///   alleles, invalid bases, or two empty alleles
    ///
    pub fn classify(reference: &str, alternate: &str) -> Result<Self, VariantError> {
        let reference = reference.trim().to_ascii_uppercase();
        let alternate = alternate.trim().to_ascii_uppercase();

        let unclassifiable = || VariantError::Unclassifiable {
            reference: reference.clone(),
            alternate: alternate.clone(),
        };

        if !reference.is_empty() && reference == alternate {
            return Ok(VariantType::NoSequenceAlteration);
        }

        if alternate.len() > 2 && alternate.starts_with('(') && alternate.ends_with(')') {
            return Ok(VariantType::SequenceAlteration);
        }

        if !is_nucleotide_sequence(&reference) || !is_nucleotide_sequence(&alternate) {
            return Err(unclassifiable());
        }

        match (reference.len(), alternate.len()) {
            (0, 0) => Err(unclassifiable()),
            (0, _) => Ok(VariantType::Ins),
            (_, 0) => Ok(VariantType::Del),
            (1, 1) => Ok(VariantType::Snv),
            (r, a) if r == a => Ok(VariantType::Mnv),
            _ => Ok(VariantType::Indel),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Snv => "SNV",
            VariantType::Mnv => "MNV",
            VariantType::Ins => "INS",
            VariantType::Del => "DEL",
            VariantType::Indel => "INDEL",
            VariantType::NoSequenceAlteration => "NO_SEQUENCE_ALTERATION",
            VariantType::SequenceAlteration => "SEQUENCE_ALTERATION",
        }
    }
}

fn is_nucleotide_sequence(allele: &str) -> bool {
    allele.bytes().all(|b| NUCLEOTIDES.contains(&b))
}

impl Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("A", "T", VariantType::Snv)]
    #[case("a", "g", VariantType::Snv)]
    #[case("AC", "GT", VariantType::Mnv)]
    #[case("", "T", VariantType::Ins)]
    #[case("T", "", VariantType::Del)]
    #[case("AT", "G", VariantType::Indel)]
    #[case("A", "A", VariantType::NoSequenceAlteration)]
    #[case("A", "(LEI0001)", VariantType::SequenceAlteration)]
    fn test_classify(#[case] reference: &str, #[case] alternate: &str, #[case] expected: VariantType) {
        assert_eq!(VariantType::classify(reference, alternate).unwrap(), expected);
    }

    #[rstest]
    #[case("A", "<DEL>")]
    #[case("", "")]
    #[case("A", "X")]
    fn test_classify_unsupported(#[case] reference: &str, #[case] alternate: &str) {
        let result = VariantType::classify(reference, alternate);
        assert!(matches!(result, Err(VariantError::Unclassifiable { .. })));
    }

    #[rstest]
    fn test_serialized_name_matches_display() {
        let json = serde_json::to_string(&VariantType::NoSequenceAlteration).unwrap();
        assert_eq!(json, "\"NO_SEQUENCE_ALTERATION\"");
        assert_eq!(VariantType::NoSequenceAlteration.to_string(), "NO_SEQUENCE_ALTERATION");
    }
}
