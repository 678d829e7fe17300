/// Entity types mirroring the knowledge-graph backend's harmonization schema.
/// Field names match the backend wire contract (snake_case throughout).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Base entity
// ---------------------------------------------------------------------------

/// A bare reference into some taxonomy (EFO ontology, UMLS, GWAS trait).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEnt {
    pub ent_id: String,
    pub ent_term: String,
}

impl BaseEnt {
    pub fn new(ent_id: impl Into<String>, ent_term: impl Into<String>) -> Self {
        Self {
            ent_id: ent_id.into(),
            ent_term: ent_term.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ontology (EFO) entities
// ---------------------------------------------------------------------------

/// An EFO concept harmonized against a query term, with its retrieval scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyEnt {
    pub ent_id: String,
    pub ent_term: String,
    /// Semantic similarity to the query term, in [0, 1].
    pub similarity_score: f64,
    /// Lexical identity score, >= 0.
    pub identity_score: f64,
    /// Information content score, in [0, 1].
    pub ic_score: f64,
}

impl OntologyEnt {
    pub fn as_base(&self) -> BaseEnt {
        BaseEnt {
            ent_id: self.ent_id.clone(),
            ent_term: self.ent_term.clone(),
        }
    }
}

/// Response of the ontology-entity lookup: a broad recall set (`candidates`)
/// and the curated subset (`ents`). The backend guarantees ents ⊆ candidates;
/// the client does not re-validate this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OntologyResponse {
    pub candidates: Vec<OntologyEnt>,
    pub ents: Vec<OntologyEnt>,
}

// ---------------------------------------------------------------------------
// Post-ontology entities (UMLS, GWAS traits)
// ---------------------------------------------------------------------------

/// Detail record linking a derived entity back to the ontology entity it came
/// from, with the cross-taxonomy similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostOntologyDetail {
    pub ent_id: String,
    pub ent_term: String,
    pub meta_ent: String,
    pub ref_ent_id: String,
    pub ref_ent_term: String,
    pub ref_meta_ent: String,
    pub similarity_score: f64,
}

/// Response of the UMLS-entity and GWAS-trait-entity lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostOntologyResponse {
    pub ents: Vec<BaseEnt>,
    pub detail_data: Vec<PostOntologyDetail>,
}

// ---------------------------------------------------------------------------
// Ontology detail data (EFO subgraph for plotting/inspection)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfoDataItem {
    pub ent_id: String,
    pub ent_term: String,
    pub ic_score: f64,
    pub ent_type: String,
    pub ref_ent_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityEdge {
    pub source_ent_id: String,
    pub source_ent_term: String,
    pub target_ent_id: String,
    pub target_ent_term: String,
    pub similarity_score: f64,
}

/// Per-entity EFO neighbourhood returned by the ontology-detail endpoint,
/// keyed by `ent_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyDetailItem {
    pub ent_id: String,
    pub efo_data: Vec<EfoDataItem>,
    pub query_ents: Vec<BaseEnt>,
    pub similarity_scores: Vec<SimilarityEdge>,
}
