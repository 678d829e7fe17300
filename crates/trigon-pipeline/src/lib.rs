//! trigon-pipeline — Entity-harmonization and evidence-aggregation pipeline.
//!
//! Drives a query session against the knowledge-graph backend:
//! - classify the claim predicate into its directionality group
//! - harmonize subject/object across taxonomies (ontology → UMLS ∥ traits)
//! - fetch, score, and join evidence for both evidence groups
//!
//! All remote access goes through the `EvidenceGateway` trait from
//! `trigon-gateway`; remote failures degrade to logged warnings, user notices,
//! and unpopulated session slots rather than aborting the run.

pub mod evidence;
pub mod harmonize;
pub mod predicate;
pub mod runner;
pub mod session;

pub use predicate::{classify, Classification};
pub use runner::{run_query, QueryOutcome, QueryReport};
pub use session::{EntSide, PostEntKind, Session};
