//! Tuning parameters for harmonization and evidence retrieval.
//! All thresholds are caller-supplied to the gateway; the gateway itself does
//! no defaulting.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonizationParams {
    /// Maximum accepted claim text length, in characters.
    #[serde(default = "default_claim_text_max_char_len")]
    pub claim_text_max_char_len: usize,

    // Query harmonization stage (ontology lookup)
    #[serde(default = "default_ontology_num_candidates")]
    pub ontology_num_candidates: u32,
    #[serde(default = "default_ontology_similarity_threshold")]
    pub ontology_similarity_score_threshold: f64,
    #[serde(default = "default_ontology_identity_threshold")]
    pub ontology_identity_score_threshold: f64,
    #[serde(default = "default_ontology_ic_threshold")]
    pub ontology_ic_score_threshold: f64,
    #[serde(default = "default_ontology_num_ents")]
    pub ontology_num_ents: u32,

    // Evidence retrieval stage (UMLS/trait lookup)
    #[serde(default = "default_post_ontology_num_candidates")]
    pub post_ontology_num_candidates: u32,
    #[serde(default = "default_post_ontology_similarity_threshold")]
    pub post_ontology_similarity_score_threshold: f64,

    // Association evidence
    #[serde(default = "default_assoc_pval_threshold")]
    pub assoc_pval_threshold: f64,
}

fn default_claim_text_max_char_len()             -> usize { 5000 }
fn default_ontology_num_candidates()             -> u32 { 15 }
fn default_ontology_similarity_threshold()       -> f64 { 0.7 }
fn default_ontology_identity_threshold()         -> f64 { 1.0 }
fn default_ontology_ic_threshold()               -> f64 { 0.6 }
fn default_ontology_num_ents()                   -> u32 { 5 }
fn default_post_ontology_num_candidates()        -> u32 { 20 }
fn default_post_ontology_similarity_threshold()  -> f64 { 0.6 }
fn default_assoc_pval_threshold()                -> f64 { 1e-2 }

impl Default for HarmonizationParams {
    fn default() -> Self {
        Self {
            claim_text_max_char_len: default_claim_text_max_char_len(),
            ontology_num_candidates: default_ontology_num_candidates(),
            ontology_similarity_score_threshold: default_ontology_similarity_threshold(),
            ontology_identity_score_threshold: default_ontology_identity_threshold(),
            ontology_ic_score_threshold: default_ontology_ic_threshold(),
            ontology_num_ents: default_ontology_num_ents(),
            post_ontology_num_candidates: default_post_ontology_num_candidates(),
            post_ontology_similarity_score_threshold: default_post_ontology_similarity_threshold(),
            assoc_pval_threshold: default_assoc_pval_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_settings() {
        let p = HarmonizationParams::default();
        assert_eq!(p.ontology_num_candidates, 15);
        assert_eq!(p.ontology_similarity_score_threshold, 0.7);
        assert_eq!(p.post_ontology_num_candidates, 20);
        assert_eq!(p.post_ontology_similarity_score_threshold, 0.6);
        assert_eq!(p.assoc_pval_threshold, 1e-2);
    }
}
