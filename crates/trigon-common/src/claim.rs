//! Claim triples: the subject–predicate–object statements driving a query
//! session, plus the parse-endpoint response shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ---------------------------------------------------------------------------
// Predicate vocabulary
// ---------------------------------------------------------------------------

/// The closed SemRep predicate vocabulary the pipeline accepts. Anything
/// outside this set is rejected at claim selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Predicate {
    Causes,
    Treats,
    Affects,
    Produces,
    AssociatedWith,
    CoexistsWith,
    InteractsWith,
}

/// Directionality class of a predicate; fixed per session and determines the
/// applicable evidence types for both evidence groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredGroup {
    Directional,
    Undirectional,
}

impl Predicate {
    pub fn group(&self) -> PredGroup {
        match self {
            Predicate::Causes
            | Predicate::Treats
            | Predicate::Affects
            | Predicate::Produces => PredGroup::Directional,
            Predicate::AssociatedWith
            | Predicate::CoexistsWith
            | Predicate::InteractsWith => PredGroup::Undirectional,
        }
    }

    /// Wire form of the predicate, as sent to evidence endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::Causes         => "CAUSES",
            Predicate::Treats         => "TREATS",
            Predicate::Affects        => "AFFECTS",
            Predicate::Produces       => "PRODUCES",
            Predicate::AssociatedWith => "ASSOCIATED_WITH",
            Predicate::CoexistsWith   => "COEXISTS_WITH",
            Predicate::InteractsWith  => "INTERACTS_WITH",
        }
    }
}

impl FromStr for Predicate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAUSES"          => Ok(Predicate::Causes),
            "TREATS"          => Ok(Predicate::Treats),
            "AFFECTS"         => Ok(Predicate::Affects),
            "PRODUCES"        => Ok(Predicate::Produces),
            "ASSOCIATED_WITH" => Ok(Predicate::AssociatedWith),
            "COEXISTS_WITH"   => Ok(Predicate::CoexistsWith),
            "INTERACTS_WITH"  => Ok(Predicate::InteractsWith),
            other             => Err(Error::UnsupportedPredicate(other.to_string())),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PredGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredGroup::Directional   => "directional",
            PredGroup::Undirectional => "undirectional",
        }
    }
}

// ---------------------------------------------------------------------------
// Parse-endpoint shapes
// ---------------------------------------------------------------------------

/// A SemRep triple as parsed from free text by the backend, before the user
/// confirms it as the session's claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedTriple {
    pub idx: u64,
    pub sub_id: String,
    pub sub_term: String,
    pub sub_text: String,
    pub sub_start_pos: u64,
    pub sub_end_pos: u64,
    pub sub_confidence_score: f64,
    pub sub_neg: bool,
    pub pred: String,
    pub pred_type: String,
    pub pred_start_pos: u64,
    pub pred_end_pos: u64,
    pub obj_id: String,
    pub obj_term: String,
    pub obj_text: String,
    pub obj_type: String,
    pub obj_start_pos: u64,
    pub obj_end_pos: u64,
    pub obj_confidence_score: f64,
    pub obj_neg: bool,
}

/// Rendered claim-text fragment for one parsed triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripleHtml {
    pub idx: u64,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseResponse {
    pub data: Vec<ParsedTriple>,
    pub html: Vec<TripleHtml>,
    pub invalid_triples: Vec<ParsedTriple>,
    pub claim_text: Vec<String>,
}

// ---------------------------------------------------------------------------
// Confirmed claim
// ---------------------------------------------------------------------------

/// The confirmed claim triple. Immutable once a session starts; its predicate
/// fixes the predicate group for the remainder of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimTriple {
    pub subject_id: String,
    pub subject_term: String,
    pub predicate: Predicate,
    pub predicate_type: String,
    pub object_id: String,
    pub object_term: String,
}

impl ClaimTriple {
    /// Build from a parsed triple; fails if the predicate term is outside the
    /// supported vocabulary.
    pub fn from_parsed(parsed: &ParsedTriple) -> Result<Self, Error> {
        Ok(Self {
            subject_id: parsed.sub_id.clone(),
            subject_term: parsed.sub_term.clone(),
            predicate: parsed.pred.parse()?,
            predicate_type: parsed.pred_type.clone(),
            object_id: parsed.obj_id.clone(),
            object_term: parsed.obj_term.clone(),
        })
    }

    pub fn subject(&self) -> crate::ents::BaseEnt {
        crate::ents::BaseEnt::new(&self.subject_id, &self.subject_term)
    }

    pub fn object(&self) -> crate::ents::BaseEnt {
        crate::ents::BaseEnt::new(&self.object_id, &self.object_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_roundtrip() {
        for term in [
            "CAUSES",
            "TREATS",
            "AFFECTS",
            "PRODUCES",
            "ASSOCIATED_WITH",
            "COEXISTS_WITH",
            "INTERACTS_WITH",
        ] {
            let pred: Predicate = term.parse().unwrap();
            assert_eq!(pred.as_str(), term);
        }
    }

    #[test]
    fn test_unknown_predicate_rejected() {
        let err = "PREVENTS".parse::<Predicate>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedPredicate(ref t) if t == "PREVENTS"));
    }

    #[test]
    fn test_predicate_groups() {
        assert_eq!(Predicate::Causes.group(), PredGroup::Directional);
        assert_eq!(Predicate::Treats.group(), PredGroup::Directional);
        assert_eq!(Predicate::AssociatedWith.group(), PredGroup::Undirectional);
        assert_eq!(Predicate::InteractsWith.group(), PredGroup::Undirectional);
    }
}
