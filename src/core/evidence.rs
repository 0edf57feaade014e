//! Evidence checker
//!
//! Each claim gets one confirmation-biased and one refutation-biased search.
//! Claims are checked concurrently up to a worker cap, in document order.
//! A failed or timed-out search leaves that claim without evidence instead
//! of failing the article.

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::adapters::WebSearch;
use crate::config::ArticleConfig;
use crate::error::{Error, Result};
use crate::types::Claim;

/// Query leaning toward confirmation
pub fn support_query(claim: &str) -> String {
    format!("\"{}\" evidence OR confirmed OR true", claim)
}

/// Query leaning toward refutation
pub fn challenge_query(claim: &str) -> String {
    format!("\"{}\" debunked OR false OR hoax OR misinformation", claim)
}

/// Searches evidence for claims
#[derive(Clone)]
pub struct EvidenceChecker {
    search: Arc<dyn WebSearch>,
    max_results: usize,
    concurrency: usize,
    timeout: Duration,
}

impl EvidenceChecker {
    pub fn new(search: Arc<dyn WebSearch>, config: &ArticleConfig) -> Self {
        Self {
            search,
            max_results: config.search_max_results,
            concurrency: config.search_concurrency.max(1),
            timeout: config.search_timeout(),
        }
    }

    /// Attach links and verdict to one claim
    pub async fn check(&self, claim: Claim) -> Claim {
        let support_q = support_query(&claim.text);
        let challenge_q = challenge_query(&claim.text);
        let (support, challenge) = tokio::join!(self.links(&support_q), self.links(&challenge_q));

        match (support, challenge) {
            (Ok(support), Ok(challenge)) => {
                let claim = claim.with_evidence(support, challenge, None);
                debug!(verdict = %claim.verdict, "claim checked");
                claim
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "evidence unavailable for claim");
                claim.with_evidence(Vec::new(), Vec::new(), Some(e.to_string()))
            }
        }
    }

    /// Check every claim, bounded concurrency, order preserved
    pub async fn check_all(&self, claims: Vec<Claim>) -> Vec<Claim> {
        stream::iter(claims)
            .map(|claim| self.check(claim))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn links(&self, query: &str) -> Result<Vec<String>> {
        let hits = tokio::time::timeout(self.timeout, self.search.search(query, self.max_results))
            .await
            .map_err(|_| Error::Timeout(format!("search after {:?}", self.timeout)))??;
        Ok(hits.into_iter().take(self.max_results).map(|h| h.url).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stub::StaticSearch;
    use crate::types::ClaimVerdict;
    use pretty_assertions::assert_eq;

    fn checker(search: StaticSearch) -> EvidenceChecker {
        EvidenceChecker::new(Arc::new(search), &ArticleConfig::default())
    }

    #[test]
    fn test_query_shapes() {
        assert_eq!(support_query("x"), "\"x\" evidence OR confirmed OR true");
        assert_eq!(challenge_query("x"), "\"x\" debunked OR false OR hoax OR misinformation");
    }

    #[test]
    fn test_classification_table_examples() {
        assert_eq!(ClaimVerdict::classify(2, 0), ClaimVerdict::LikelyTrue);
        assert_eq!(ClaimVerdict::classify(1, 3), ClaimVerdict::LikelyFalse);
        assert_eq!(ClaimVerdict::classify(2, 2), ClaimVerdict::MixedEvidence);
        assert_eq!(ClaimVerdict::classify(0, 0), ClaimVerdict::NoEvidence);
        assert_eq!(ClaimVerdict::classify(1, 1), ClaimVerdict::MixedEvidence);
        assert_eq!(ClaimVerdict::classify(0, 1), ClaimVerdict::MoreAgainst);
        assert_eq!(ClaimVerdict::classify(1, 0), ClaimVerdict::MoreFor);
        assert_eq!(ClaimVerdict::classify(3, 2), ClaimVerdict::MoreFor);
        assert_eq!(ClaimVerdict::classify(2, 3), ClaimVerdict::MoreAgainst);
    }

    #[test]
    fn test_classification_is_total_and_ordered() {
        for support in 0..=5usize {
            for challenge in 0..=5usize {
                let expected = if support == 0 && challenge == 0 {
                    ClaimVerdict::NoEvidence
                } else if challenge >= 2 && support <= 1 {
                    ClaimVerdict::LikelyFalse
                } else if support >= 2 && challenge <= 1 {
                    ClaimVerdict::LikelyTrue
                } else if challenge > support {
                    ClaimVerdict::MoreAgainst
                } else if support > challenge {
                    ClaimVerdict::MoreFor
                } else {
                    ClaimVerdict::MixedEvidence
                };
                let got = ClaimVerdict::classify(support, challenge);
                assert_eq!(got, expected, "({}, {})", support, challenge);
                assert_eq!(got, ClaimVerdict::classify(support, challenge));
            }
        }
    }

    #[tokio::test]
    async fn test_check_counts_distinct_links() {
        let search = StaticSearch::uniform(
            &["https://a.example", "https://a.example", "https://b.example"],
            &["https://c.example"],
        );
        let claim = checker(search).check(Claim::new("The dam was completed in 1936.")).await;
        assert_eq!(claim.support_links, vec!["https://a.example", "https://b.example"]);
        assert_eq!(claim.verdict, ClaimVerdict::LikelyTrue);
        assert!(claim.evidence_error.is_none());
    }

    #[tokio::test]
    async fn test_failed_search_degrades_to_no_evidence() {
        let search = StaticSearch::uniform(&["https://a.example", "https://b.example"], &[])
            .failing_for("moon");
        let checker = checker(search);
        let claims = checker
            .check_all(vec![
                Claim::new("The moon landing was staged in 1969."),
                Claim::new("The dam was completed in 1936."),
            ])
            .await;

        assert_eq!(claims[0].verdict, ClaimVerdict::NoEvidence);
        assert!(claims[0].evidence_error.is_some());
        assert_eq!(claims[1].verdict, ClaimVerdict::LikelyTrue);
    }

    #[tokio::test]
    async fn test_slow_search_times_out_one_claim() {
        let search = StaticSearch::uniform(&["https://a.example", "https://b.example"], &[])
            .slow_for("harbour", Duration::from_secs(5));
        let config = ArticleConfig {
            search_timeout_secs: 1,
            ..ArticleConfig::default()
        };
        let checker = EvidenceChecker::new(Arc::new(search), &config);

        let claims = checker
            .check_all(vec![
                Claim::new("The dam was completed in 1936."),
                Claim::new("The harbour was dredged in 1988."),
                Claim::new("The bridge was opened in 1932."),
            ])
            .await;

        assert_eq!(claims[1].verdict, ClaimVerdict::NoEvidence);
        let err = claims[1].evidence_error.as_deref().unwrap();
        assert!(err.contains("Timed out"), "got {}", err);
        assert_eq!(claims[0].verdict, ClaimVerdict::LikelyTrue);
        assert_eq!(claims[2].verdict, ClaimVerdict::LikelyTrue);
        assert!(claims[0].evidence_error.is_none());
    }

    #[tokio::test]
    async fn test_check_all_keeps_order() {
        let search = StaticSearch::uniform(&[], &[])
            .with_claim("first", &[], &["https://x", "https://y"])
            .with_claim("second", &["https://x", "https://y"], &[]);
        let claims = checker(search)
            .check_all(vec![Claim::new("first claim"), Claim::new("second claim")])
            .await;
        assert_eq!(claims[0].verdict, ClaimVerdict::LikelyFalse);
        assert_eq!(claims[1].verdict, ClaimVerdict::LikelyTrue);
    }
}
