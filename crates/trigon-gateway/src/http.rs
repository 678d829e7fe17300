//! HTTP implementation of the evidence gateway over `reqwest`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use trigon_common::claim::ParseResponse;
use trigon_common::ents::{OntologyDetailItem, OntologyResponse, PostOntologyResponse};
use trigon_common::evidence::{
    AssocEvidencePreItem, AssocScoreItem, LiteratureLiteResponse, LiteratureResponse,
    TripleEvidencePreItem, TripleScoreItem,
};
use trigon_common::Result;

use crate::config::GatewayConfig;
use crate::payloads::{
    AssocEvidenceRequest, AssocScoreRequest, LiteratureLiteRequest, LiteratureRequest,
    OntologyDetailRequest, OntologyEntsRequest, ParseClaimRequest, TraitEntsRequest,
    TripleEvidenceRequest, TripleScoreRequest, UmlsEntsRequest,
};
use crate::EvidenceGateway;

/// `{ data: [...] }` envelope used by several endpoints.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    async fn post_json<P, T>(&self, path: &str, payload: &P) -> Result<T>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path)?;
        let resp = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(resp)
    }
}

/// Stamp each item with its position in the response array. Pre-evidence
/// records carry no server-side index; joins rely on this one.
fn annotate_idx<T, F>(items: Vec<T>, set_idx: F) -> Vec<T>
where
    F: Fn(T, u64) -> T,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| set_idx(item, i as u64))
        .collect()
}

#[async_trait]
impl EvidenceGateway for HttpGateway {
    #[instrument(skip(self, claim_text))]
    async fn parse_claim(&self, claim_text: &str) -> Result<ParseResponse> {
        let payload = ParseClaimRequest {
            claim_text: claim_text.to_string(),
        };
        let resp: ParseResponse = self.post_json("claim_parsing/parse", &payload).await?;
        debug!(
            n_triples = resp.data.len(),
            n_invalid = resp.invalid_triples.len(),
            "claim parsed"
        );
        Ok(resp)
    }

    #[instrument(skip(self, req), fields(ent_id = %req.ent_id))]
    async fn ontology_ents(&self, req: &OntologyEntsRequest) -> Result<OntologyResponse> {
        let resp: OntologyResponse = self
            .post_json("ent_harmonization/ontology_ents", req)
            .await?;
        debug!(
            n_candidates = resp.candidates.len(),
            n_ents = resp.ents.len(),
            "ontology entities retrieved"
        );
        Ok(resp)
    }

    #[instrument(skip(self, req), fields(ent_id = %req.query_umls_ent.ent_id))]
    async fn umls_ents(&self, req: &UmlsEntsRequest) -> Result<PostOntologyResponse> {
        let resp: PostOntologyResponse =
            self.post_json("ent_harmonization/umls_ents", req).await?;
        debug!(n_ents = resp.ents.len(), "UMLS entities retrieved");
        Ok(resp)
    }

    #[instrument(skip(self, req), fields(n_ontology_ents = req.ents.len()))]
    async fn trait_ents(&self, req: &TraitEntsRequest) -> Result<PostOntologyResponse> {
        let resp: PostOntologyResponse =
            self.post_json("ent_harmonization/trait_ents", req).await?;
        debug!(n_ents = resp.ents.len(), "trait entities retrieved");
        Ok(resp)
    }

    #[instrument(skip(self, req), fields(evidence_type = %req.evidence_type))]
    async fn triple_evidence(
        &self,
        req: &TripleEvidenceRequest,
    ) -> Result<Vec<TripleEvidencePreItem>> {
        let items: Vec<TripleEvidencePreItem> = self.post_json("evidence/triples", req).await?;
        debug!(n_items = items.len(), "triple evidence retrieved");
        Ok(annotate_idx(items, |mut item, idx| {
            item.idx = idx;
            item
        }))
    }

    #[instrument(skip(self, req), fields(n_triples = req.triple_items.len()))]
    async fn literature_lite_evidence(
        &self,
        req: &LiteratureLiteRequest,
    ) -> Result<LiteratureLiteResponse> {
        let resp: LiteratureLiteResponse =
            self.post_json("evidence/literature-lite", req).await?;
        debug!(n_items = resp.data.len(), "literature-lite evidence retrieved");
        Ok(resp)
    }

    #[instrument(skip(self, req), fields(n_triples = req.triple_items.len()))]
    async fn literature_evidence(&self, req: &LiteratureRequest) -> Result<LiteratureResponse> {
        let resp: LiteratureResponse = self.post_json("evidence/literature", req).await?;
        debug!(n_items = resp.data.len(), "literature evidence retrieved");
        Ok(resp)
    }

    #[instrument(skip(self, req), fields(evidence_type = %req.evidence_type))]
    async fn assoc_evidence(
        &self,
        req: &AssocEvidenceRequest,
    ) -> Result<Vec<AssocEvidencePreItem>> {
        let resp: DataEnvelope<AssocEvidencePreItem> =
            self.post_json("evidence/association", req).await?;
        debug!(n_items = resp.data.len(), "association evidence retrieved");
        Ok(annotate_idx(resp.data, |mut item, idx| {
            item.idx = idx;
            item
        }))
    }

    #[instrument(skip(self, req), fields(n_items = req.triple_evidence.len()))]
    async fn score_triple_evidence(
        &self,
        req: &TripleScoreRequest,
    ) -> Result<Vec<TripleScoreItem>> {
        let resp: DataEnvelope<TripleScoreItem> = self.post_json("scores/triples", req).await?;
        Ok(resp.data)
    }

    #[instrument(skip(self, req), fields(n_items = req.assoc_evidence.len()))]
    async fn score_assoc_evidence(&self, req: &AssocScoreRequest) -> Result<Vec<AssocScoreItem>> {
        let resp: DataEnvelope<AssocScoreItem> = self.post_json("scores/assoc", req).await?;
        Ok(resp.data)
    }

    #[instrument(skip(self, req), fields(n_ents = req.ent_ids.len()))]
    async fn ontology_detail(
        &self,
        req: &OntologyDetailRequest,
    ) -> Result<Vec<OntologyDetailItem>> {
        self.post_json("data/ontology", req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_idx_is_positional() {
        let items = vec!["a", "b", "c"]
            .into_iter()
            .map(|s| (0u64, s))
            .collect::<Vec<_>>();
        let annotated = annotate_idx(items, |mut item, idx| {
            item.0 = idx;
            item
        });
        assert_eq!(annotated, vec![(0, "a"), (1, "b"), (2, "c")]);
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_fails_with_config_error() {
        let gateway = HttpGateway::new(GatewayConfig::unconfigured());
        let err = gateway.parse_claim("obesity causes hypertension").await;
        assert!(matches!(err, Err(trigon_common::Error::Config(_))));
    }
}
