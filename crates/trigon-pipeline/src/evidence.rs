//! Evidence aggregation.
//!
//! For each applicable evidence type (concurrently across types): fetch the
//! unscored pre-evidence, short-circuit on an empty batch, otherwise fetch
//! scores for the whole batch and join the two by positional `idx`. A score
//! lookup miss is a backend data-integrity defect; the affected item is
//! dropped with a warning and the rest of the batch survives.
//!
//! The slim literature fetch is dependent on combined triple evidence and runs
//! strictly after triple aggregation, per evidence type.

use std::collections::HashMap;

use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use trigon_common::evidence::{
    AssocEvidenceType, AssocScoreItem, CombinedAssocItem, CombinedTripleItem,
    LiteratureLiteResponse, LiteratureResponse, TripleEvidencePreItem, TripleEvidenceType,
    TripleScoreItem,
};
use trigon_common::{Error, Result};

use trigon_gateway::payloads::{
    AssocEvidenceRequest, AssocScoreRequest, LiteratureLiteRequest, LiteratureRequest,
    TripleEvidenceRequest, TripleItemRef, TripleScoreInput, TripleScoreRequest,
};
use trigon_gateway::EvidenceGateway;

use crate::session::{EntSide, PostEntKind, Session};

// ── Join core ────────────────────────────────────────────────────────────

/// Join triple pre-evidence with its scores by `idx`, preserving pre order.
/// Returns the combined items and the number dropped on join miss.
pub fn combine_triple(
    pre: Vec<TripleEvidencePreItem>,
    scores: Vec<TripleScoreItem>,
    evidence_type: &str,
) -> (Vec<CombinedTripleItem>, usize) {
    let mut lookup: HashMap<u64, TripleScoreItem> = HashMap::with_capacity(scores.len());
    for score in scores {
        if let Some(prev) = lookup.insert(score.idx, score) {
            debug!(evidence_type, idx = prev.idx, "duplicate score idx; keeping last");
        }
    }
    let mut dropped = 0;
    let combined = pre
        .into_iter()
        .filter_map(|item| match lookup.get(&item.idx) {
            Some(score) => Some(CombinedTripleItem {
                mapping_score: score.mapping_score,
                triple_score: score.triple_score,
                evidence_score: score.evidence_score,
                mapping_data: score.mapping_data.clone(),
                item,
            }),
            None => {
                let defect = Error::JoinIntegrity {
                    evidence_type: evidence_type.to_string(),
                    idx: item.idx,
                };
                warn!(error = %defect, "evidence item dropped");
                dropped += 1;
                None
            }
        })
        .collect();
    (combined, dropped)
}

/// Association counterpart of [`combine_triple`].
pub fn combine_assoc(
    pre: Vec<trigon_common::evidence::AssocEvidencePreItem>,
    scores: Vec<AssocScoreItem>,
    evidence_type: &str,
) -> (Vec<CombinedAssocItem>, usize) {
    let mut lookup: HashMap<u64, AssocScoreItem> = HashMap::with_capacity(scores.len());
    for score in scores {
        if let Some(prev) = lookup.insert(score.idx, score) {
            debug!(evidence_type, idx = prev.idx, "duplicate score idx; keeping last");
        }
    }
    let mut dropped = 0;
    let combined = pre
        .into_iter()
        .filter_map(|item| match lookup.get(&item.idx) {
            Some(score) => Some(CombinedAssocItem {
                mapping_score: score.mapping_score,
                assoc_score: score.assoc_score,
                evidence_score: score.evidence_score,
                mapping_data: score.mapping_data.clone(),
                item,
            }),
            None => {
                let defect = Error::JoinIntegrity {
                    evidence_type: evidence_type.to_string(),
                    idx: item.idx,
                };
                warn!(error = %defect, "evidence item dropped");
                dropped += 1;
                None
            }
        })
        .collect();
    (combined, dropped)
}

// ── Request builders ─────────────────────────────────────────────────────

fn post_ontology_base_ents(
    session: &Session,
    kind: PostEntKind,
    side: EntSide,
) -> Vec<trigon_common::ents::BaseEnt> {
    session
        .post_ontology_ents(kind, side)
        .map(|r| r.ents.clone())
        .unwrap_or_default()
}

fn post_ontology_details(
    session: &Session,
    kind: PostEntKind,
    side: EntSide,
) -> Vec<trigon_common::ents::PostOntologyDetail> {
    session
        .post_ontology_ents(kind, side)
        .map(|r| r.detail_data.clone())
        .unwrap_or_default()
}

fn ontology_mapping(session: &Session, side: EntSide) -> Vec<trigon_common::ents::OntologyEnt> {
    session
        .ontology_ents(side)
        .map(|o| o.ents.clone())
        .unwrap_or_default()
}

/// Score request with everything but the per-type evidence projection.
fn triple_score_template(session: &Session) -> TripleScoreRequest {
    let claim = session.claim();
    TripleScoreRequest {
        triple_evidence: Vec::new(),
        query_subject_term: claim.subject_term.clone(),
        query_object_term: claim.object_term.clone(),
        ontology_subject_mapping: ontology_mapping(session, EntSide::Subject),
        ontology_object_mapping: ontology_mapping(session, EntSide::Object),
        umls_subject_mapping: post_ontology_details(session, PostEntKind::Umls, EntSide::Subject),
        umls_object_mapping: post_ontology_details(session, PostEntKind::Umls, EntSide::Object),
    }
}

fn assoc_score_template(session: &Session) -> AssocScoreRequest {
    let claim = session.claim();
    AssocScoreRequest {
        assoc_evidence: Vec::new(),
        query_subject_term: claim.subject_term.clone(),
        query_object_term: claim.object_term.clone(),
        ontology_subject_mapping: ontology_mapping(session, EntSide::Subject),
        ontology_object_mapping: ontology_mapping(session, EntSide::Object),
        trait_subject_mapping: post_ontology_details(session, PostEntKind::Trait, EntSide::Subject),
        trait_object_mapping: post_ontology_details(session, PostEntKind::Trait, EntSide::Object),
    }
}

fn project_for_scoring(item: &TripleEvidencePreItem) -> TripleScoreInput {
    TripleScoreInput {
        idx: item.idx,
        ent_subject_id: item.ent_subject_id.clone(),
        ent_object_id: item.ent_object_id.clone(),
        ent_subject_term: item.ent_subject_term.clone(),
        ent_object_term: item.ent_object_term.clone(),
        literature_count: item.literature_count,
    }
}

// ── Group aggregation ────────────────────────────────────────────────────

/// Fetch-and-combine for every triple evidence type, concurrently across
/// types. Pure with respect to the session; the caller applies the writes.
pub(crate) async fn fetch_triple_group<G>(
    gateway: &G,
    session: &Session,
) -> Vec<(TripleEvidenceType, Result<(Vec<CombinedTripleItem>, usize)>)>
where
    G: EvidenceGateway + ?Sized,
{
    let claim = session.claim();
    let template = triple_score_template(session);
    let subject_ents = post_ontology_base_ents(session, PostEntKind::Umls, EntSide::Subject);
    let object_ents = post_ontology_base_ents(session, PostEntKind::Umls, EntSide::Object);

    let futures = session
        .classification()
        .triple_types
        .iter()
        .map(|&evidence_type| {
            let req = TripleEvidenceRequest {
                subject_ents: subject_ents.clone(),
                object_ents: object_ents.clone(),
                pred_term: claim.predicate.as_str().to_string(),
                evidence_type: evidence_type.as_str().to_string(),
            };
            let mut score_req = template.clone();
            async move {
                let res = async {
                    let pre = gateway.triple_evidence(&req).await?;
                    if pre.is_empty() {
                        return Ok((Vec::new(), 0));
                    }
                    score_req.triple_evidence = pre.iter().map(project_for_scoring).collect();
                    let scores = gateway.score_triple_evidence(&score_req).await?;
                    Ok(combine_triple(pre, scores, evidence_type.as_str()))
                }
                .await;
                (evidence_type, res)
            }
        })
        .collect::<Vec<_>>();
    join_all(futures).await
}

/// Fetch-and-combine for every association evidence type, concurrently across
/// types.
pub(crate) async fn fetch_assoc_group<G>(
    gateway: &G,
    session: &Session,
) -> Vec<(AssocEvidenceType, Result<(Vec<CombinedAssocItem>, usize)>)>
where
    G: EvidenceGateway + ?Sized,
{
    let claim = session.claim();
    let template = assoc_score_template(session);
    let subject_ents = post_ontology_base_ents(session, PostEntKind::Trait, EntSide::Subject);
    let object_ents = post_ontology_base_ents(session, PostEntKind::Trait, EntSide::Object);
    let pval_threshold = session.params.assoc_pval_threshold;

    let futures = session
        .classification()
        .assoc_types
        .iter()
        .map(|&evidence_type| {
            let req = AssocEvidenceRequest {
                subject_ents: subject_ents.clone(),
                object_ents: object_ents.clone(),
                pred_term: claim.predicate.as_str().to_string(),
                pval_threshold,
                evidence_type: evidence_type.as_str().to_string(),
            };
            let mut score_req = template.clone();
            async move {
                let res = async {
                    let pre = gateway.assoc_evidence(&req).await?;
                    if pre.is_empty() {
                        return Ok((Vec::new(), 0));
                    }
                    score_req.assoc_evidence = pre.clone();
                    let scores = gateway.score_assoc_evidence(&score_req).await?;
                    Ok(combine_assoc(pre, scores, evidence_type.as_str()))
                }
                .await;
                (evidence_type, res)
            }
        })
        .collect::<Vec<_>>();
    join_all(futures).await
}

/// Fetch slim literature links for every triple evidence type whose combined
/// evidence is present, concurrently across types. Types whose triple slot is
/// unpopulated (fetch failed) are skipped.
pub(crate) async fn fetch_literature_lite<G>(
    gateway: &G,
    session: &Session,
) -> Vec<(TripleEvidenceType, Result<LiteratureLiteResponse>)>
where
    G: EvidenceGateway + ?Sized,
{
    let claim = session.claim();
    let futures = session
        .classification()
        .triple_types
        .iter()
        .filter_map(|&evidence_type| {
            let items = session.triple_evidence(evidence_type)?;
            let req = LiteratureLiteRequest {
                triple_items: items
                    .iter()
                    .map(|c| TripleItemRef {
                        triple_id: c.item.triple_id.clone(),
                        triple_label: c.item.triple_lower.clone(),
                    })
                    .collect(),
                claim_subject_term: claim.subject_term.clone(),
                claim_object_term: claim.object_term.clone(),
            };
            Some(async move { (evidence_type, gateway.literature_lite_evidence(&req).await) })
        })
        .collect::<Vec<_>>();
    join_all(futures).await
}

// ── Per-triple literature drill-down ─────────────────────────────────────

/// One triple selected for the literature detail view.
#[derive(Debug, Clone)]
pub struct TripleDetail {
    pub triple_id: String,
    pub triple_label: String,
    pub subject_term: String,
    pub object_term: String,
}

/// Fetch full literature records for a single triple. Not part of the
/// aggregation completion predicate.
#[instrument(skip(gateway, session), fields(triple_id = %triple.triple_id))]
pub async fn fetch_literature<G>(
    gateway: &G,
    session: &Session,
    triple: &TripleDetail,
    num_items: u32,
) -> Result<LiteratureResponse>
where
    G: EvidenceGateway + ?Sized,
{
    let claim = session.claim();
    let req = LiteratureRequest {
        triple_items: vec![TripleItemRef {
            triple_id: triple.triple_id.clone(),
            triple_label: triple.triple_label.clone(),
        }],
        num_literature_items_per_triple: num_items,
        triple_subject_term: triple.subject_term.clone(),
        triple_object_term: triple.object_term.clone(),
        claim_subject_term: claim.subject_term.clone(),
        claim_object_term: claim.object_term.clone(),
    };
    gateway.literature_evidence(&req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trigon_common::evidence::AssocEvidencePreItem;

    fn pre_item(idx: u64) -> TripleEvidencePreItem {
        TripleEvidencePreItem {
            idx,
            triple_id: format!("T{idx}"),
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
            literature_count: 3,
        }
    }

    fn score_item(idx: u64, evidence_score: f64) -> TripleScoreItem {
        TripleScoreItem {
            idx,
            mapping_score: 0.8,
            triple_score: 1.1,
            evidence_score,
            mapping_data: json!({}),
        }
    }

    #[test]
    fn test_combine_preserves_length_and_order() {
        let pre = vec![pre_item(0), pre_item(1), pre_item(2)];
        // scores arrive out of order
        let scores = vec![score_item(2, 3.0), score_item(0, 1.0), score_item(1, 2.0)];
        let (combined, dropped) = combine_triple(pre, scores, "supporting");
        assert_eq!(dropped, 0);
        assert_eq!(combined.len(), 3);
        let idxs: Vec<u64> = combined.iter().map(|c| c.item.idx).collect();
        assert_eq!(idxs, vec![0, 1, 2]);
        let evidence_scores: Vec<f64> = combined.iter().map(|c| c.evidence_score).collect();
        assert_eq!(evidence_scores, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_combine_drops_on_join_miss() {
        let pre = vec![pre_item(0), pre_item(1)];
        let scores = vec![score_item(1, 2.0)];
        let (combined, dropped) = combine_triple(pre, scores, "supporting");
        assert_eq!(dropped, 1);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].item.idx, 1);
    }

    #[test]
    fn test_combine_duplicate_score_idx_keeps_last() {
        let pre = vec![pre_item(0)];
        let scores = vec![score_item(0, 1.0), score_item(0, 9.0)];
        let (combined, dropped) = combine_triple(pre, scores, "supporting");
        assert_eq!(dropped, 0);
        assert_eq!(combined[0].evidence_score, 9.0);
    }

    #[test]
    fn test_combine_assoc_merges_score_fields() {
        let pre = vec![AssocEvidencePreItem {
            idx: 0,
            subject_id: "ieu-a-1".into(),
            subject_term: "body mass index".into(),
            object_id: "ieu-a-2".into(),
            object_term: "systolic blood pressure".into(),
            meta_rel: "MR".into(),
            direction: "forward".into(),
            effect_size: 0.3,
            se: 0.05,
            pval: 1e-5,
            rel_data: json!(null),
        }];
        let scores = vec![AssocScoreItem {
            idx: 0,
            mapping_score: 0.7,
            assoc_score: 1.4,
            evidence_score: 2.2,
            mapping_data: json!({"subject": "ieu-a-1"}),
        }];
        let (combined, dropped) = combine_assoc(pre, scores, "supporting");
        assert_eq!(dropped, 0);
        assert_eq!(combined[0].assoc_score, 1.4);
        assert_eq!(combined[0].item.pval, 1e-5);
    }
}
