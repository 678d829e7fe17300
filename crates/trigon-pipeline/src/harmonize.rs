//! Harmonization orchestrator.
//!
//! Stage 1 resolves the claim's subject and object against the EFO ontology
//! (two concurrent lookups). Only when both sides return a non-empty curated
//! ent set do stages 2 (UMLS) and 3 (GWAS traits) run; those two stages are
//! independent and run concurrently, with subject and object concurrent
//! within each.

use tracing::{info, instrument, warn};

use trigon_common::ents::BaseEnt;
use trigon_common::notice::{Notice, NoticeSender};
use trigon_common::Result;

use trigon_gateway::payloads::{OntologyEntsRequest, TraitEntsRequest, UmlsEntsRequest};
use trigon_gateway::EvidenceGateway;

use crate::session::{EntSide, OntologyEnts, PostEntKind, Session};

/// Terminal state of a harmonization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarmonizationOutcome {
    /// All six entity slots populated.
    Complete,
    /// The backend answered but found no ontology representation for the
    /// claim's subject or object. A valid claim outcome, not an error.
    NotPossible,
    /// One or more lookups failed at the transport level; affected slots are
    /// unpopulated and downstream stages must not run.
    Failed,
}

/// Run the full harmonization state machine for the session's claim.
#[instrument(skip(gateway, session, notices), fields(generation = session.generation()))]
pub async fn run_harmonization<G>(
    gateway: &G,
    session: &mut Session,
    notices: &NoticeSender,
) -> HarmonizationOutcome
where
    G: EvidenceGateway + ?Sized,
{
    let generation = session.generation();

    // ── Stage 1: ontology lookup (subject ∥ object) ──────────────────────
    let subject_req = ontology_request(session, EntSide::Subject);
    let object_req = ontology_request(session, EntSide::Object);
    let (subject_res, object_res) = tokio::join!(
        gateway.ontology_ents(&subject_req),
        gateway.ontology_ents(&object_req),
    );

    let (subject, object) = match (subject_res, object_res) {
        (Ok(s), Ok(o)) => (s, o),
        (s, o) => {
            for (side, res) in [("subject", &s), ("object", &o)] {
                if let Err(e) = res {
                    warn!(side, error = %e, "ontology lookup failed");
                }
            }
            notices.send(Notice::general_warning());
            return HarmonizationOutcome::Failed;
        }
    };

    if subject.candidates.is_empty() || object.candidates.is_empty() {
        info!(
            subject_candidates = subject.candidates.len(),
            object_candidates = object.candidates.len(),
            "no ontology candidates for claim; harmonization not possible"
        );
        return HarmonizationOutcome::NotPossible;
    }

    store_or_warn(session.set_ontology_ents(
        EntSide::Subject,
        generation,
        OntologyEnts {
            candidates: subject.candidates,
            ents: subject.ents,
        },
    ));
    store_or_warn(session.set_ontology_ents(
        EntSide::Object,
        generation,
        OntologyEnts {
            candidates: object.candidates,
            ents: object.ents,
        },
    ));

    if !session.ontology_ents_done() {
        info!("curated ontology ent set empty on at least one side; harmonization not possible");
        return HarmonizationOutcome::NotPossible;
    }

    // ── Stages 2 ∥ 3: UMLS and trait lookup ──────────────────────────────
    let umls_subject_req = umls_request(session, EntSide::Subject);
    let umls_object_req = umls_request(session, EntSide::Object);
    let trait_subject_req = trait_request(session, EntSide::Subject);
    let trait_object_req = trait_request(session, EntSide::Object);

    let (umls_subject, umls_object, trait_subject, trait_object) = tokio::join!(
        gateway.umls_ents(&umls_subject_req),
        gateway.umls_ents(&umls_object_req),
        gateway.trait_ents(&trait_subject_req),
        gateway.trait_ents(&trait_object_req),
    );

    let mut failed = false;
    let results = [
        (PostEntKind::Umls, EntSide::Subject, umls_subject),
        (PostEntKind::Umls, EntSide::Object, umls_object),
        (PostEntKind::Trait, EntSide::Subject, trait_subject),
        (PostEntKind::Trait, EntSide::Object, trait_object),
    ];
    for (kind, side, res) in results {
        match res {
            Ok(resp) => {
                store_or_warn(session.set_post_ontology_ents(kind, side, generation, resp));
            }
            Err(e) => {
                warn!(?kind, ?side, error = %e, "post-ontology lookup failed");
                failed = true;
            }
        }
    }
    if failed {
        notices.send(Notice::general_warning());
        return HarmonizationOutcome::Failed;
    }

    if session.all_ents_done() {
        HarmonizationOutcome::Complete
    } else {
        HarmonizationOutcome::Failed
    }
}

fn ontology_request(session: &Session, side: EntSide) -> OntologyEntsRequest {
    let claim = session.claim();
    let (ent_id, ent_term) = match side {
        EntSide::Subject => (&claim.subject_id, &claim.subject_term),
        EntSide::Object => (&claim.object_id, &claim.object_term),
    };
    OntologyEntsRequest {
        ent_id: ent_id.clone(),
        ent_term: ent_term.clone(),
        num_ent_candidates: session.params.ontology_num_candidates,
        similarity_threshold: session.params.ontology_similarity_score_threshold,
    }
}

/// Harmonized ontology ents for one side, projected to bare references.
fn ontology_base_ents(session: &Session, side: EntSide) -> Vec<BaseEnt> {
    session
        .ontology_ents(side)
        .map(|o| o.ents.iter().map(|e| e.as_base()).collect())
        .unwrap_or_default()
}

fn umls_request(session: &Session, side: EntSide) -> UmlsEntsRequest {
    let claim = session.claim();
    let query_umls_ent = match side {
        EntSide::Subject => claim.subject(),
        EntSide::Object => claim.object(),
    };
    UmlsEntsRequest {
        query_umls_ent,
        ontology_ents: ontology_base_ents(session, side),
        num_similarity_candidates: session.params.post_ontology_num_candidates,
        similarity_score_threshold: session.params.post_ontology_similarity_score_threshold,
    }
}

fn trait_request(session: &Session, side: EntSide) -> TraitEntsRequest {
    TraitEntsRequest {
        ents: ontology_base_ents(session, side),
        pred_term: session.claim().predicate.as_str().to_string(),
        num_ent_candidates: session.params.post_ontology_num_candidates,
        similarity_threshold: session.params.post_ontology_similarity_score_threshold,
    }
}

/// A stale-generation write means a re-run superseded this one; log and move
/// on, the response is discarded.
fn store_or_warn(res: Result<()>) {
    if let Err(e) = res {
        warn!(error = %e, "slot write discarded");
    }
}
