//! trigon-gateway — Remote evidence gateway.
//!
//! One async operation per knowledge-graph backend endpoint, behind the
//! `EvidenceGateway` trait so the pipeline can run against an in-memory fake
//! in tests. Operations return `Result`: an empty payload is a successful
//! response, a transport or server failure is an error. The pipeline layer
//! decides how failures degrade (log + user notice + absent slot).

pub mod config;
pub mod http;
pub mod payloads;

use async_trait::async_trait;

use trigon_common::claim::ParseResponse;
use trigon_common::ents::{OntologyDetailItem, OntologyResponse, PostOntologyResponse};
use trigon_common::evidence::{
    AssocEvidencePreItem, AssocScoreItem, LiteratureLiteResponse, LiteratureResponse,
    TripleEvidencePreItem, TripleScoreItem,
};
use trigon_common::Result;

use crate::payloads::{
    AssocEvidenceRequest, AssocScoreRequest, LiteratureLiteRequest, LiteratureRequest,
    OntologyDetailRequest, OntologyEntsRequest, TraitEntsRequest, TripleEvidenceRequest,
    TripleScoreRequest, UmlsEntsRequest,
};

pub use config::GatewayConfig;
pub use http::HttpGateway;

/// Common interface to the knowledge-graph backend.
#[async_trait]
pub trait EvidenceGateway: Send + Sync {
    /// Parse free claim text into candidate triples.
    async fn parse_claim(&self, claim_text: &str) -> Result<ParseResponse>;

    /// Harmonize one query entity against the EFO ontology.
    async fn ontology_ents(&self, req: &OntologyEntsRequest) -> Result<OntologyResponse>;

    /// Derive UMLS entities from harmonized ontology entities.
    async fn umls_ents(&self, req: &UmlsEntsRequest) -> Result<PostOntologyResponse>;

    /// Derive GWAS trait entities from harmonized ontology entities.
    async fn trait_ents(&self, req: &TraitEntsRequest) -> Result<PostOntologyResponse>;

    /// Fetch unscored triple evidence for one evidence type. Items carry
    /// their positional `idx` on return.
    async fn triple_evidence(
        &self,
        req: &TripleEvidenceRequest,
    ) -> Result<Vec<TripleEvidencePreItem>>;

    /// Fetch slim literature links for already-combined triple evidence.
    async fn literature_lite_evidence(
        &self,
        req: &LiteratureLiteRequest,
    ) -> Result<LiteratureLiteResponse>;

    /// Fetch full literature records for one triple (detail view).
    async fn literature_evidence(&self, req: &LiteratureRequest) -> Result<LiteratureResponse>;

    /// Fetch unscored association evidence for one evidence type. Items carry
    /// their positional `idx` on return.
    async fn assoc_evidence(&self, req: &AssocEvidenceRequest)
        -> Result<Vec<AssocEvidencePreItem>>;

    /// Score a batch of triple evidence.
    async fn score_triple_evidence(&self, req: &TripleScoreRequest)
        -> Result<Vec<TripleScoreItem>>;

    /// Score a batch of association evidence.
    async fn score_assoc_evidence(&self, req: &AssocScoreRequest) -> Result<Vec<AssocScoreItem>>;

    /// Fetch EFO neighbourhood data for a set of ontology entities.
    async fn ontology_detail(&self, req: &OntologyDetailRequest)
        -> Result<Vec<OntologyDetailItem>>;
}
