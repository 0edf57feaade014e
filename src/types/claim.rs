//! Claims and their evidence verdicts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict for one claim, derived only from link counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimVerdict {
    NoEvidence,
    LikelyTrue,
    LikelyFalse,
    MixedEvidence,
    MoreAgainst,
    MoreFor,
}

impl ClaimVerdict {
    /// Ordered rule table; the asymmetric rules win over strict inequality
    pub fn classify(support: usize, challenge: usize) -> Self {
        if support == 0 && challenge == 0 {
            Self::NoEvidence
        } else if challenge >= 2 && support <= 1 {
            Self::LikelyFalse
        } else if support >= 2 && challenge <= 1 {
            Self::LikelyTrue
        } else if challenge > support {
            Self::MoreAgainst
        } else if support > challenge {
            Self::MoreFor
        } else {
            Self::MixedEvidence
        }
    }

    /// Verdicts that count toward "claims look false"
    pub fn is_against(&self) -> bool {
        matches!(self, Self::LikelyFalse | Self::MoreAgainst)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoEvidence => "No evidence found",
            Self::LikelyTrue => "Likely True",
            Self::LikelyFalse => "Likely False/Misleading",
            Self::MixedEvidence => "Mixed / Inconclusive evidence",
            Self::MoreAgainst => "More evidence against than for",
            Self::MoreFor => "More evidence supporting than against",
        }
    }
}

impl fmt::Display for ClaimVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A sentence judged likely to assert a checkable fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    /// Distinct URLs from the confirmation-biased query
    pub support_links: Vec<String>,
    /// Distinct URLs from the refutation-biased query
    pub challenge_links: Vec<String>,
    pub verdict: ClaimVerdict,
    /// Set when a search failed and the links are incomplete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_error: Option<String>,
}

impl Claim {
    /// Unchecked claim, as produced by the extractor
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            support_links: Vec::new(),
            challenge_links: Vec::new(),
            verdict: ClaimVerdict::NoEvidence,
            evidence_error: None,
        }
    }

    /// Attach evidence; the verdict follows from the distinct link counts
    pub fn with_evidence(
        self,
        support_links: Vec<String>,
        challenge_links: Vec<String>,
        evidence_error: Option<String>,
    ) -> Self {
        let support_links = dedup_links(support_links);
        let challenge_links = dedup_links(challenge_links);
        let verdict = ClaimVerdict::classify(support_links.len(), challenge_links.len());
        Self {
            text: self.text,
            support_links,
            challenge_links,
            verdict,
            evidence_error,
        }
    }
}

/// Collapse duplicate URLs, keeping first-seen order
fn dedup_links(links: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    links.into_iter().filter(|l| seen.insert(l.clone())).collect()
}
