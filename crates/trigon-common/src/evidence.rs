//! Evidence records and evidence-type vocabularies.
//!
//! Evidence comes in two groups with separate endpoint pairs: triple/literature
//! evidence (SemRep knowledge-graph triples plus their literature) and
//! association evidence (GWAS trait associations). Each group has its own
//! pre-item, score-item, and combined-item shapes; pre and score records are
//! joined on a shared positional `idx`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Evidence-type vocabularies
// ---------------------------------------------------------------------------

/// Evidence types of the triple/literature group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripleEvidenceType {
    Supporting,
    Contradictory,
}

impl TripleEvidenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripleEvidenceType::Supporting    => "supporting",
            TripleEvidenceType::Contradictory => "contradictory",
        }
    }

    /// Display label shown in evidence summaries.
    pub fn label(&self) -> &'static str {
        match self {
            TripleEvidenceType::Supporting    => "Supporting evidence",
            TripleEvidenceType::Contradictory => "Contradictory evidence, reversal",
        }
    }
}

/// Evidence types of the association group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssocEvidenceType {
    Supporting,
    ContradictoryUndirectional,
    ContradictoryDirectionalType1,
    ContradictoryDirectionalType2,
    GenericDirectional,
}

impl AssocEvidenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssocEvidenceType::Supporting                    => "supporting",
            AssocEvidenceType::ContradictoryUndirectional    => "contradictory_undirectional",
            AssocEvidenceType::ContradictoryDirectionalType1 => "contradictory_directional_type1",
            AssocEvidenceType::ContradictoryDirectionalType2 => "contradictory_directional_type2",
            AssocEvidenceType::GenericDirectional            => "generic_directional",
        }
    }

    /// Display label shown in evidence summaries.
    pub fn label(&self) -> &'static str {
        match self {
            AssocEvidenceType::Supporting                    => "Supporting evidence",
            AssocEvidenceType::ContradictoryUndirectional    => "Insufficient evidence",
            AssocEvidenceType::ContradictoryDirectionalType1 => "Contradictory evidence, reversal",
            AssocEvidenceType::ContradictoryDirectionalType2 => "Insufficient evidence",
            AssocEvidenceType::GenericDirectional            => "Additional general evidence",
        }
    }
}

// ---------------------------------------------------------------------------
// Triple evidence
// ---------------------------------------------------------------------------

/// Unscored triple evidence record. `idx` is its position in the backend
/// response array, assigned client-side at deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripleEvidencePreItem {
    #[serde(default)]
    pub idx: u64,
    pub triple_id: String,
    pub triple_label: String,
    pub triple_lower: String,
    pub triple_subject_id: String,
    pub triple_subject: String,
    pub triple_object_id: String,
    pub triple_object: String,
    pub triple_predicate: String,
    pub ent_subject_id: String,
    pub ent_object_id: String,
    pub ent_subject_term: String,
    pub ent_object_term: String,
    pub direction: String,
    pub literature_count: u64,
}

/// Backend-computed scores for one triple evidence record, keyed by `idx`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripleScoreItem {
    pub idx: u64,
    pub mapping_score: f64,
    pub triple_score: f64,
    pub evidence_score: f64,
    pub mapping_data: Value,
}

/// A pre-item merged with its scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedTripleItem {
    #[serde(flatten)]
    pub item: TripleEvidencePreItem,
    pub mapping_score: f64,
    pub triple_score: f64,
    pub evidence_score: f64,
    pub mapping_data: Value,
}

// ---------------------------------------------------------------------------
// Association evidence
// ---------------------------------------------------------------------------

/// Unscored association evidence record, `idx` assigned client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssocEvidencePreItem {
    #[serde(default)]
    pub idx: u64,
    pub subject_id: String,
    pub subject_term: String,
    pub object_id: String,
    pub object_term: String,
    pub meta_rel: String,
    pub direction: String,
    pub effect_size: f64,
    pub se: f64,
    pub pval: f64,
    pub rel_data: Value,
}

/// Backend-computed scores for one association evidence record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssocScoreItem {
    pub idx: u64,
    pub mapping_score: f64,
    pub assoc_score: f64,
    pub evidence_score: f64,
    pub mapping_data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedAssocItem {
    #[serde(flatten)]
    pub item: AssocEvidencePreItem,
    pub mapping_score: f64,
    pub assoc_score: f64,
    pub evidence_score: f64,
    pub mapping_data: Value,
}

// ---------------------------------------------------------------------------
// Literature evidence
// ---------------------------------------------------------------------------

/// Slim literature record linking a triple to its PubMed sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteratureLiteItem {
    pub pubmed_id: String,
    pub triple_id: String,
    pub triple_lower: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiteratureLiteResponse {
    pub data: Vec<LiteratureLiteItem>,
}

/// Full literature record for the per-triple drill-down view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteratureItem {
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub doi: String,
    pub pubmed_id: String,
    pub title: String,
    pub triple_id: String,
    pub triple_lower: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub year: i32,
}

/// Sentence-level display fragments accompanying full literature records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteratureHtmlItem {
    pub idx: u64,
    pub title_text: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub sentence: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiteratureResponse {
    pub data: Vec<LiteratureItem>,
    pub html_text: Vec<LiteratureHtmlItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_type_wire_strings() {
        assert_eq!(TripleEvidenceType::Supporting.as_str(), "supporting");
        assert_eq!(TripleEvidenceType::Contradictory.as_str(), "contradictory");
        assert_eq!(
            AssocEvidenceType::ContradictoryDirectionalType1.as_str(),
            "contradictory_directional_type1"
        );
        assert_eq!(
            AssocEvidenceType::GenericDirectional.as_str(),
            "generic_directional"
        );
    }

    #[test]
    fn test_combined_item_flattens_pre_fields() {
        let combined = CombinedTripleItem {
            item: TripleEvidencePreItem {
                idx: 0,
                triple_id: "T1".into(),
                triple_label: "Obesity CAUSES Hypertension".into(),
                triple_lower: "obesity causes hypertension".into(),
                triple_subject_id: "C0028754".into(),
                triple_subject: "Obesity".into(),
                triple_object_id: "C0020538".into(),
                triple_object: "Hypertension".into(),
                triple_predicate: "CAUSES".into(),
                ent_subject_id: "C0028754".into(),
                ent_object_id: "C0020538".into(),
                ent_subject_term: "obesity".into(),
                ent_object_term: "hypertension".into(),
                direction: "forward".into(),
                literature_count: 12,
            },
            mapping_score: 0.9,
            triple_score: 1.2,
            evidence_score: 2.5,
            mapping_data: serde_json::json!({}),
        };
        let value = serde_json::to_value(&combined).unwrap();
        assert_eq!(value["triple_id"], "T1");
        assert_eq!(value["evidence_score"], 2.5);
    }
}
