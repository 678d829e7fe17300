//! End-to-end query runner.
//!
//! Drives the full flow for one confirmed claim triple:
//!   1. Harmonize subject/object across taxonomies (ontology → UMLS ∥ traits)
//!   2. Fetch, score, and join triple evidence and association evidence
//!      (the two groups run concurrently)
//!   3. Fetch slim literature links for the combined triple evidence
//!
//! The run is non-destructive: remote failures are logged, surfaced as user
//! notices, and accumulated in the report; the rest of the pipeline continues
//! with whatever data arrived.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use trigon_common::claim::ParseResponse;
use trigon_common::notice::{Notice, NoticeSender};
use trigon_common::params::HarmonizationParams;
use trigon_common::Result;

use trigon_gateway::EvidenceGateway;

use crate::evidence::{fetch_assoc_group, fetch_literature_lite, fetch_triple_group};
use crate::harmonize::{run_harmonization, HarmonizationOutcome};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Every entity and evidence slot applicable to the session populated.
    Complete,
    /// The claim has no ontology representation; nothing downstream ran.
    HarmonizationNotPossible,
    /// One or more remote calls failed; some slots are unpopulated.
    Partial,
}

/// Summary of one query run.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub query_id: Uuid,
    pub outcome: QueryOutcome,
    pub errors: Vec<String>,
    pub num_triple_items: usize,
    pub num_literature_items: usize,
    pub num_assoc_items: usize,
    /// Evidence items dropped because their score join missed.
    pub num_dropped_items: usize,
    pub duration_ms: u64,
}

/// Parse free claim text into candidate triples, enforcing the configured
/// length cap. Transport failures surface a notice and an error.
#[instrument(skip(gateway, text, params, notices), fields(len = text.len()))]
pub async fn parse_claim_text<G>(
    gateway: &G,
    text: &str,
    params: &HarmonizationParams,
    notices: &NoticeSender,
) -> Result<ParseResponse>
where
    G: EvidenceGateway + ?Sized,
{
    if text.chars().count() > params.claim_text_max_char_len {
        let msg = format!(
            "Claim text exceeds the maximum length of {} characters.",
            params.claim_text_max_char_len
        );
        notices.send(Notice::warning(msg.clone()));
        return Err(trigon_common::Error::Config(msg));
    }
    match gateway.parse_claim(text).await {
        Ok(resp) => Ok(resp),
        Err(e) => {
            warn!(error = %e, "claim parsing failed");
            notices.send(Notice::general_warning());
            Err(e)
        }
    }
}

/// Run harmonization and evidence aggregation for the session's claim.
#[instrument(skip(gateway, session, notices), fields(predicate = %session.claim().predicate))]
pub async fn run_query<G>(
    gateway: &G,
    session: &mut Session,
    notices: &NoticeSender,
) -> QueryReport
where
    G: EvidenceGateway + ?Sized,
{
    let query_id = Uuid::new_v4();
    let t0 = Instant::now();
    let generation = session.generation();

    let claim = session.claim();
    info!(
        query_id = %query_id,
        subject = %claim.subject_term,
        predicate = %claim.predicate,
        object = %claim.object_term,
        group = session.pred_group().as_str(),
        "starting triangulation query"
    );

    let mut report = QueryReport {
        query_id,
        outcome: QueryOutcome::Partial,
        errors: Vec::new(),
        num_triple_items: 0,
        num_literature_items: 0,
        num_assoc_items: 0,
        num_dropped_items: 0,
        duration_ms: 0,
    };

    // ── Harmonization ────────────────────────────────────────────────────
    match run_harmonization(gateway, session, notices).await {
        HarmonizationOutcome::Complete => {}
        HarmonizationOutcome::NotPossible => {
            notices.send(Notice::info(
                "The claim's subject or object could not be harmonized to ontology entities.",
            ));
            report.outcome = QueryOutcome::HarmonizationNotPossible;
            report.duration_ms = t0.elapsed().as_millis() as u64;
            return report;
        }
        HarmonizationOutcome::Failed => {
            report.errors.push("entity harmonization failed".to_string());
            report.duration_ms = t0.elapsed().as_millis() as u64;
            return report;
        }
    }

    // ── Evidence aggregation (triple group ∥ association group) ──────────
    let (triple_results, assoc_results) = tokio::join!(
        fetch_triple_group(gateway, session),
        fetch_assoc_group(gateway, session),
    );

    for (evidence_type, res) in triple_results {
        match res {
            Ok((items, dropped)) => {
                report.num_triple_items += items.len();
                report.num_dropped_items += dropped;
                if let Err(e) = session.set_triple_evidence(evidence_type, generation, items) {
                    warn!(error = %e, "triple evidence write discarded");
                }
            }
            Err(e) => {
                warn!(
                    evidence_type = evidence_type.as_str(),
                    error = %e,
                    "triple evidence aggregation failed"
                );
                notices.send(Notice::general_warning());
                report
                    .errors
                    .push(format!("triple evidence ({}): {e}", evidence_type.as_str()));
            }
        }
    }

    for (evidence_type, res) in assoc_results {
        match res {
            Ok((items, dropped)) => {
                report.num_assoc_items += items.len();
                report.num_dropped_items += dropped;
                if let Err(e) = session.set_assoc_evidence(evidence_type, generation, items) {
                    warn!(error = %e, "association evidence write discarded");
                }
            }
            Err(e) => {
                warn!(
                    evidence_type = evidence_type.as_str(),
                    error = %e,
                    "association evidence aggregation failed"
                );
                notices.send(Notice::general_warning());
                report
                    .errors
                    .push(format!("association evidence ({}): {e}", evidence_type.as_str()));
            }
        }
    }

    // ── Literature links, dependent on combined triple evidence ──────────
    for (evidence_type, res) in fetch_literature_lite(gateway, session).await {
        match res {
            Ok(resp) => {
                report.num_literature_items += resp.data.len();
                if let Err(e) = session.set_literature_evidence(evidence_type, generation, resp) {
                    warn!(error = %e, "literature evidence write discarded");
                }
            }
            Err(e) => {
                warn!(
                    evidence_type = evidence_type.as_str(),
                    error = %e,
                    "literature evidence fetch failed"
                );
                notices.send(Notice::general_warning());
                report
                    .errors
                    .push(format!("literature evidence ({}): {e}", evidence_type.as_str()));
            }
        }
    }

    report.outcome = if report.errors.is_empty() && session.all_evidence_done() {
        QueryOutcome::Complete
    } else {
        QueryOutcome::Partial
    };
    report.duration_ms = t0.elapsed().as_millis() as u64;

    info!(
        query_id = %query_id,
        outcome = ?report.outcome,
        triple_items = report.num_triple_items,
        literature_items = report.num_literature_items,
        assoc_items = report.num_assoc_items,
        dropped_items = report.num_dropped_items,
        errors = report.errors.len(),
        duration_ms = report.duration_ms,
        "triangulation query finished"
    );

    report
}
