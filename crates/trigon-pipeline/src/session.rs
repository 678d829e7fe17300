//! Session state for one query.
//!
//! An explicit context object owned by the caller, not ambient global state.
//! Entity and evidence results land in slots that start unpopulated; a stage
//! re-run goes through `invalidate`, which bumps the session generation and
//! clears the affected slots wholesale. Every write carries the generation the
//! stage run started under, so a late response from a superseded run is
//! discarded instead of clobbering newer state.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use trigon_common::claim::{ClaimTriple, PredGroup};
use trigon_common::ents::{OntologyEnt, PostOntologyResponse};
use trigon_common::evidence::{
    AssocEvidenceType, CombinedAssocItem, CombinedTripleItem, LiteratureLiteResponse,
    TripleEvidenceType,
};
use trigon_common::params::HarmonizationParams;
use trigon_common::{Error, Result};

use crate::predicate::{classify, Classification};

/// Which side of the claim an entity slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntSide {
    Subject,
    Object,
}

/// Taxonomy of a post-ontology entity slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostEntKind {
    Umls,
    Trait,
}

/// Harmonized ontology populations for one claim side.
#[derive(Debug, Clone, Default)]
pub struct OntologyEnts {
    pub candidates: Vec<OntologyEnt>,
    pub ents: Vec<OntologyEnt>,
}

#[derive(Debug)]
pub struct Session {
    claim: ClaimTriple,
    classification: Classification,
    pub params: HarmonizationParams,
    generation: u64,

    // Entity slots; `None` means "not yet fetched" for the current generation.
    ontology_subject: Option<OntologyEnts>,
    ontology_object: Option<OntologyEnts>,
    umls_subject: Option<PostOntologyResponse>,
    umls_object: Option<PostOntologyResponse>,
    trait_subject: Option<PostOntologyResponse>,
    trait_object: Option<PostOntologyResponse>,

    triple_evidence: HashMap<TripleEvidenceType, Vec<CombinedTripleItem>>,
    literature_evidence: HashMap<TripleEvidenceType, LiteratureLiteResponse>,
    assoc_evidence: HashMap<AssocEvidenceType, Vec<CombinedAssocItem>>,
}

impl Session {
    pub fn new(claim: ClaimTriple, params: HarmonizationParams) -> Self {
        let classification = classify(claim.predicate);
        Self {
            claim,
            classification,
            params,
            generation: 0,
            ontology_subject: None,
            ontology_object: None,
            umls_subject: None,
            umls_object: None,
            trait_subject: None,
            trait_object: None,
            triple_evidence: HashMap::new(),
            literature_evidence: HashMap::new(),
            assoc_evidence: HashMap::new(),
        }
    }

    pub fn claim(&self) -> &ClaimTriple {
        &self.claim
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn pred_group(&self) -> PredGroup {
        self.classification.group
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fresh run after a parameter change: bump the generation and
    /// clear every result slot. In-flight responses from the previous run
    /// will fail the generation check on write.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        debug!(generation = self.generation, "session invalidated");
        self.ontology_subject = None;
        self.ontology_object = None;
        self.umls_subject = None;
        self.umls_object = None;
        self.trait_subject = None;
        self.trait_object = None;
        self.triple_evidence.clear();
        self.literature_evidence.clear();
        self.assoc_evidence.clear();
    }

    fn check_generation(&self, write_generation: u64) -> Result<()> {
        if write_generation != self.generation {
            return Err(Error::StaleGeneration {
                write_generation,
                current_generation: self.generation,
            });
        }
        Ok(())
    }

    // ── Entity slot writes ───────────────────────────────────────────────

    pub fn set_ontology_ents(
        &mut self,
        side: EntSide,
        generation: u64,
        ents: OntologyEnts,
    ) -> Result<()> {
        self.check_generation(generation)?;
        let slot = match side {
            EntSide::Subject => &mut self.ontology_subject,
            EntSide::Object => &mut self.ontology_object,
        };
        *slot = Some(ents);
        Ok(())
    }

    pub fn set_post_ontology_ents(
        &mut self,
        kind: PostEntKind,
        side: EntSide,
        generation: u64,
        resp: PostOntologyResponse,
    ) -> Result<()> {
        self.check_generation(generation)?;
        let slot = match (kind, side) {
            (PostEntKind::Umls, EntSide::Subject) => &mut self.umls_subject,
            (PostEntKind::Umls, EntSide::Object) => &mut self.umls_object,
            (PostEntKind::Trait, EntSide::Subject) => &mut self.trait_subject,
            (PostEntKind::Trait, EntSide::Object) => &mut self.trait_object,
        };
        *slot = Some(resp);
        Ok(())
    }

    // ── Evidence slot writes ─────────────────────────────────────────────

    pub fn set_triple_evidence(
        &mut self,
        evidence_type: TripleEvidenceType,
        generation: u64,
        items: Vec<CombinedTripleItem>,
    ) -> Result<()> {
        self.check_generation(generation)?;
        self.triple_evidence.insert(evidence_type, items);
        Ok(())
    }

    pub fn set_literature_evidence(
        &mut self,
        evidence_type: TripleEvidenceType,
        generation: u64,
        resp: LiteratureLiteResponse,
    ) -> Result<()> {
        self.check_generation(generation)?;
        self.literature_evidence.insert(evidence_type, resp);
        Ok(())
    }

    pub fn set_assoc_evidence(
        &mut self,
        evidence_type: AssocEvidenceType,
        generation: u64,
        items: Vec<CombinedAssocItem>,
    ) -> Result<()> {
        self.check_generation(generation)?;
        self.assoc_evidence.insert(evidence_type, items);
        Ok(())
    }

    // ── Entity reads ─────────────────────────────────────────────────────

    pub fn ontology_ents(&self, side: EntSide) -> Option<&OntologyEnts> {
        match side {
            EntSide::Subject => self.ontology_subject.as_ref(),
            EntSide::Object => self.ontology_object.as_ref(),
        }
    }

    pub fn post_ontology_ents(
        &self,
        kind: PostEntKind,
        side: EntSide,
    ) -> Option<&PostOntologyResponse> {
        match (kind, side) {
            (PostEntKind::Umls, EntSide::Subject) => self.umls_subject.as_ref(),
            (PostEntKind::Umls, EntSide::Object) => self.umls_object.as_ref(),
            (PostEntKind::Trait, EntSide::Subject) => self.trait_subject.as_ref(),
            (PostEntKind::Trait, EntSide::Object) => self.trait_object.as_ref(),
        }
    }

    /// Both ontology candidate sets retrieved and non-empty.
    pub fn ontology_candidates_done(&self) -> bool {
        [EntSide::Subject, EntSide::Object].iter().all(|&side| {
            self.ontology_ents(side)
                .map(|o| !o.candidates.is_empty())
                .unwrap_or(false)
        })
    }

    /// Both curated ontology ent sets retrieved and non-empty; gates the
    /// UMLS/trait stages.
    pub fn ontology_ents_done(&self) -> bool {
        [EntSide::Subject, EntSide::Object].iter().all(|&side| {
            self.ontology_ents(side)
                .map(|o| !o.ents.is_empty())
                .unwrap_or(false)
        })
    }

    /// All six entity slots populated (possibly with empty result sets).
    pub fn all_ents_done(&self) -> bool {
        let ontology_done =
            self.ontology_subject.is_some() && self.ontology_object.is_some();
        let post_done = [
            (PostEntKind::Umls, EntSide::Subject),
            (PostEntKind::Umls, EntSide::Object),
            (PostEntKind::Trait, EntSide::Subject),
            (PostEntKind::Trait, EntSide::Object),
        ]
        .iter()
        .all(|&(kind, side)| self.post_ontology_ents(kind, side).is_some());
        ontology_done && post_done
    }

    // ── Evidence reads ───────────────────────────────────────────────────

    pub fn triple_evidence(
        &self,
        evidence_type: TripleEvidenceType,
    ) -> Option<&Vec<CombinedTripleItem>> {
        self.triple_evidence.get(&evidence_type)
    }

    pub fn literature_evidence(
        &self,
        evidence_type: TripleEvidenceType,
    ) -> Option<&LiteratureLiteResponse> {
        self.literature_evidence.get(&evidence_type)
    }

    pub fn assoc_evidence(
        &self,
        evidence_type: AssocEvidenceType,
    ) -> Option<&Vec<CombinedAssocItem>> {
        self.assoc_evidence.get(&evidence_type)
    }

    /// Every evidence slot applicable to this session's predicate group is
    /// populated (triple, literature, and association).
    pub fn all_evidence_done(&self) -> bool {
        let triple_done = self
            .classification
            .triple_types
            .iter()
            .all(|t| self.triple_evidence.contains_key(t));
        let literature_done = self
            .classification
            .triple_types
            .iter()
            .all(|t| self.literature_evidence.contains_key(t));
        let assoc_done = self
            .classification
            .assoc_types
            .iter()
            .all(|t| self.assoc_evidence.contains_key(t));
        triple_done && literature_done && assoc_done
    }

    // ── Summary ──────────────────────────────────────────────────────────

    /// Parameter/mapping/evidence counts for display.
    pub fn summary(&self) -> QuerySummary {
        let ontology_counts = |side| {
            self.ontology_ents(side)
                .map(|o| OntologyMappingCounts {
                    num_candidates: o.candidates.len(),
                    num_ents: o.ents.len(),
                })
        };
        let post_counts =
            |kind, side| self.post_ontology_ents(kind, side).map(|r| r.ents.len());

        QuerySummary {
            claim: self.claim.clone(),
            params: self.params.clone(),
            mapping: MappingSummary {
                ontology_subjects: ontology_counts(EntSide::Subject),
                ontology_objects: ontology_counts(EntSide::Object),
                umls_subjects: post_counts(PostEntKind::Umls, EntSide::Subject),
                umls_objects: post_counts(PostEntKind::Umls, EntSide::Object),
                trait_subjects: post_counts(PostEntKind::Trait, EntSide::Subject),
                trait_objects: post_counts(PostEntKind::Trait, EntSide::Object),
            },
            triple_evidence: self
                .classification
                .triple_types
                .iter()
                .map(|&t| TripleEvidenceSummaryRow {
                    evidence_type: t.label().to_string(),
                    num_triple_items: self.triple_evidence(t).map(|v| v.len()),
                    num_literature_items: self.literature_evidence(t).map(|r| r.data.len()),
                })
                .collect(),
            assoc_evidence: self
                .classification
                .assoc_types
                .iter()
                .map(|&t| AssocEvidenceSummaryRow {
                    evidence_type: t.label().to_string(),
                    num_items: self.assoc_evidence(t).map(|v| v.len()),
                })
                .collect(),
        }
    }
}

// ── Summary shapes ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct OntologyMappingCounts {
    pub num_candidates: usize,
    pub num_ents: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MappingSummary {
    pub ontology_subjects: Option<OntologyMappingCounts>,
    pub ontology_objects: Option<OntologyMappingCounts>,
    pub umls_subjects: Option<usize>,
    pub umls_objects: Option<usize>,
    pub trait_subjects: Option<usize>,
    pub trait_objects: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripleEvidenceSummaryRow {
    pub evidence_type: String,
    pub num_triple_items: Option<usize>,
    pub num_literature_items: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssocEvidenceSummaryRow {
    pub evidence_type: String,
    pub num_items: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuerySummary {
    pub claim: ClaimTriple,
    pub params: HarmonizationParams,
    pub mapping: MappingSummary,
    pub triple_evidence: Vec<TripleEvidenceSummaryRow>,
    pub assoc_evidence: Vec<AssocEvidenceSummaryRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use trigon_common::claim::Predicate;
    use trigon_common::ents::BaseEnt;

    fn claim() -> ClaimTriple {
        ClaimTriple {
            subject_id: "C0028754".into(),
            subject_term: "obesity".into(),
            predicate: Predicate::Causes,
            predicate_type: "verb".into(),
            object_id: "C0020538".into(),
            object_term: "hypertension".into(),
        }
    }

    fn ontology_ent(id: &str) -> OntologyEnt {
        OntologyEnt {
            ent_id: id.into(),
            ent_term: "term".into(),
            similarity_score: 0.9,
            identity_score: 1.0,
            ic_score: 0.8,
        }
    }

    #[test]
    fn test_slots_start_unpopulated() {
        let session = Session::new(claim(), HarmonizationParams::default());
        assert!(session.ontology_ents(EntSide::Subject).is_none());
        assert!(!session.all_ents_done());
        assert!(!session.all_evidence_done());
    }

    #[test]
    fn test_all_ents_done_after_six_slots() {
        let mut session = Session::new(claim(), HarmonizationParams::default());
        let generation = session.generation();
        for side in [EntSide::Subject, EntSide::Object] {
            session
                .set_ontology_ents(
                    side,
                    generation,
                    OntologyEnts {
                        candidates: vec![ontology_ent("EFO:1")],
                        ents: vec![ontology_ent("EFO:1")],
                    },
                )
                .unwrap();
            for kind in [PostEntKind::Umls, PostEntKind::Trait] {
                session
                    .set_post_ontology_ents(
                        kind,
                        side,
                        generation,
                        PostOntologyResponse {
                            ents: vec![BaseEnt::new("X", "x")],
                            detail_data: vec![],
                        },
                    )
                    .unwrap();
            }
        }
        assert!(session.ontology_candidates_done());
        assert!(session.ontology_ents_done());
        assert!(session.all_ents_done());
    }

    #[test]
    fn test_empty_post_ontology_still_counts_as_done() {
        let mut session = Session::new(claim(), HarmonizationParams::default());
        let generation = session.generation();
        for side in [EntSide::Subject, EntSide::Object] {
            session
                .set_ontology_ents(
                    side,
                    generation,
                    OntologyEnts {
                        candidates: vec![ontology_ent("EFO:1")],
                        ents: vec![ontology_ent("EFO:1")],
                    },
                )
                .unwrap();
            for kind in [PostEntKind::Umls, PostEntKind::Trait] {
                session
                    .set_post_ontology_ents(kind, side, generation, PostOntologyResponse::default())
                    .unwrap();
            }
        }
        assert!(session.all_ents_done());
    }

    #[test]
    fn test_stale_write_is_rejected() {
        let mut session = Session::new(claim(), HarmonizationParams::default());
        let stale = session.generation();
        session.invalidate();
        let err = session
            .set_ontology_ents(EntSide::Subject, stale, OntologyEnts::default())
            .unwrap_err();
        assert!(matches!(err, Error::StaleGeneration { .. }));
        assert!(session.ontology_ents(EntSide::Subject).is_none());
    }

    #[test]
    fn test_summary_rows_follow_predicate_group() {
        let mut session = Session::new(claim(), HarmonizationParams::default());
        let generation = session.generation();
        session
            .set_ontology_ents(
                EntSide::Subject,
                generation,
                OntologyEnts {
                    candidates: vec![ontology_ent("EFO:1"), ontology_ent("EFO:2")],
                    ents: vec![ontology_ent("EFO:1")],
                },
            )
            .unwrap();
        session
            .set_triple_evidence(TripleEvidenceType::Supporting, generation, vec![])
            .unwrap();

        let summary = session.summary();
        // Directional claim: two triple rows, four association rows.
        assert_eq!(summary.triple_evidence.len(), 2);
        assert_eq!(summary.assoc_evidence.len(), 4);

        let subject = summary.mapping.ontology_subjects.unwrap();
        assert_eq!(subject.num_candidates, 2);
        assert_eq!(subject.num_ents, 1);
        assert!(summary.mapping.ontology_objects.is_none());
        assert!(summary.mapping.umls_subjects.is_none());

        assert_eq!(summary.triple_evidence[0].num_triple_items, Some(0));
        assert_eq!(summary.triple_evidence[1].num_triple_items, None);
        assert!(summary
            .assoc_evidence
            .iter()
            .all(|row| row.num_items.is_none()));
    }

    #[test]
    fn test_invalidate_clears_slots() {
        let mut session = Session::new(claim(), HarmonizationParams::default());
        let generation = session.generation();
        session
            .set_triple_evidence(TripleEvidenceType::Supporting, generation, vec![])
            .unwrap();
        assert!(session
            .triple_evidence(TripleEvidenceType::Supporting)
            .is_some());
        session.invalidate();
        assert!(session
            .triple_evidence(TripleEvidenceType::Supporting)
            .is_none());
    }
}
