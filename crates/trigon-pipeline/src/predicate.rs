//! Predicate classification.
//!
//! The claim's predicate fixes its directionality group, and the group fixes
//! which evidence types apply in each evidence group. Pure and total over the
//! `Predicate` enum; unknown predicate terms are already rejected at
//! `Predicate` parse time.

use serde::Serialize;

use trigon_common::claim::{PredGroup, Predicate};
use trigon_common::evidence::{AssocEvidenceType, TripleEvidenceType};

/// Applicable triple/literature evidence types, in retrieval order.
pub fn triple_evidence_types(group: PredGroup) -> &'static [TripleEvidenceType] {
    match group {
        PredGroup::Undirectional => &[TripleEvidenceType::Supporting],
        PredGroup::Directional => &[
            TripleEvidenceType::Supporting,
            TripleEvidenceType::Contradictory,
        ],
    }
}

/// Applicable association evidence types, in retrieval order.
pub fn assoc_evidence_types(group: PredGroup) -> &'static [AssocEvidenceType] {
    match group {
        PredGroup::Undirectional => &[
            AssocEvidenceType::Supporting,
            AssocEvidenceType::ContradictoryUndirectional,
        ],
        PredGroup::Directional => &[
            AssocEvidenceType::Supporting,
            AssocEvidenceType::ContradictoryDirectionalType1,
            AssocEvidenceType::ContradictoryDirectionalType2,
            AssocEvidenceType::GenericDirectional,
        ],
    }
}

/// Result of classifying a claim predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub group: PredGroup,
    pub triple_types: Vec<TripleEvidenceType>,
    pub assoc_types: Vec<AssocEvidenceType>,
}

pub fn classify(predicate: Predicate) -> Classification {
    let group = predicate.group();
    Classification {
        group,
        triple_types: triple_evidence_types(group).to_vec(),
        assoc_types: assoc_evidence_types(group).to_vec(),
    }
}
