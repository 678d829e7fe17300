//! Request payloads for every backend endpoint, field-for-field against the
//! backend wire contract. All thresholds and candidate limits are supplied by
//! the caller; the gateway never substitutes defaults.

use serde::Serialize;

use trigon_common::ents::{BaseEnt, OntologyEnt, PostOntologyDetail};
use trigon_common::evidence::AssocEvidencePreItem;

// ---------------------------------------------------------------------------
// Claim parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ParseClaimRequest {
    pub claim_text: String,
}

// ---------------------------------------------------------------------------
// Entity harmonization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct OntologyEntsRequest {
    pub ent_id: String,
    pub ent_term: String,
    pub num_ent_candidates: u32,
    pub similarity_threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UmlsEntsRequest {
    pub query_umls_ent: BaseEnt,
    pub ontology_ents: Vec<BaseEnt>,
    pub num_similarity_candidates: u32,
    pub similarity_score_threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraitEntsRequest {
    pub ents: Vec<BaseEnt>,
    pub pred_term: String,
    pub num_ent_candidates: u32,
    pub similarity_threshold: f64,
}

// ---------------------------------------------------------------------------
// Evidence retrieval
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TripleEvidenceRequest {
    pub subject_ents: Vec<BaseEnt>,
    pub object_ents: Vec<BaseEnt>,
    pub pred_term: String,
    pub evidence_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssocEvidenceRequest {
    pub subject_ents: Vec<BaseEnt>,
    pub object_ents: Vec<BaseEnt>,
    pub pred_term: String,
    pub pval_threshold: f64,
    pub evidence_type: String,
}

/// Reference to one triple in a literature request.
#[derive(Debug, Clone, Serialize)]
pub struct TripleItemRef {
    pub triple_id: String,
    pub triple_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiteratureLiteRequest {
    pub triple_items: Vec<TripleItemRef>,
    pub claim_subject_term: String,
    pub claim_object_term: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiteratureRequest {
    pub triple_items: Vec<TripleItemRef>,
    pub num_literature_items_per_triple: u32,
    pub triple_subject_term: String,
    pub triple_object_term: String,
    pub claim_subject_term: String,
    pub claim_object_term: String,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Projection of a triple pre-item sent to the scoring endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TripleScoreInput {
    pub idx: u64,
    pub ent_subject_id: String,
    pub ent_object_id: String,
    pub ent_subject_term: String,
    pub ent_object_term: String,
    pub literature_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripleScoreRequest {
    pub triple_evidence: Vec<TripleScoreInput>,
    pub query_subject_term: String,
    pub query_object_term: String,
    pub ontology_subject_mapping: Vec<OntologyEnt>,
    pub ontology_object_mapping: Vec<OntologyEnt>,
    pub umls_subject_mapping: Vec<PostOntologyDetail>,
    pub umls_object_mapping: Vec<PostOntologyDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssocScoreRequest {
    pub assoc_evidence: Vec<AssocEvidencePreItem>,
    pub query_subject_term: String,
    pub query_object_term: String,
    pub ontology_subject_mapping: Vec<OntologyEnt>,
    pub ontology_object_mapping: Vec<OntologyEnt>,
    pub trait_subject_mapping: Vec<PostOntologyDetail>,
    pub trait_object_mapping: Vec<PostOntologyDetail>,
}

// ---------------------------------------------------------------------------
// Ontology detail data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct OntologyDetailRequest {
    pub ent_ids: Vec<String>,
    pub query_terms: Vec<String>,
}
