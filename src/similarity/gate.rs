//! Duplicate gate
//!
//! Decides whether a candidate submission is a near-copy of an already
//! registered work. The candidate and all existing contents are fetched
//! through a [`ContentSource`]; fetch failures degrade to empty content and
//! only ever weaken the evidence (a work the gate cannot read is admitted,
//! never rejected).
//!
//! The batch fetch runs through a bounded pool of concurrent requests and
//! preserves input order. Scoring then walks the pairs in that order and
//! stops at the first score over the threshold, so the reported match is
//! the first-registered offender, not the best one. Fetching always runs to
//! completion before scoring begins; the early exit shortens only the
//! scoring phase.

use futures_util::{stream, StreamExt};
use std::sync::Arc;
use tracing::{debug, info};

use crate::similarity::scorer;
use crate::store::{ContentSource, FetchedContent};

/// Verdict for one registration attempt. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityVerdict {
    /// Whether the candidate is rejected as a copy
    pub copied: bool,
    /// Address of the first existing work over the threshold
    pub match_address: Option<String>,
    /// Score of that match, in [0, 100]
    pub similarity: Option<f64>,
}

impl SimilarityVerdict {
    fn clear() -> Self {
        Self {
            copied: false,
            match_address: None,
            similarity: None,
        }
    }

    fn copied(match_address: String, similarity: f64) -> Self {
        Self {
            copied: true,
            match_address: Some(match_address),
            similarity: Some(similarity),
        }
    }
}

/// Gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Similarity percentage at or above which a candidate is rejected
    pub threshold: f64,
    /// Bound on concurrent content fetches during the batch phase
    pub fetch_concurrency: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: 80.0,
            fetch_concurrency: 8,
        }
    }
}

/// Duplicate gate over a content source
pub struct DuplicateGate {
    source: Arc<dyn ContentSource>,
    config: GateConfig,
}

impl DuplicateGate {
    pub fn new(source: Arc<dyn ContentSource>, config: GateConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Check a candidate against the supplied existing addresses
    ///
    /// `existing` order is significant: pairs are scored in that order and
    /// the first match wins.
    pub async fn check(&self, candidate: &str, existing: &[String]) -> SimilarityVerdict {
        let candidate_content = self.source.fetch(candidate).await;
        if candidate_content.is_empty() {
            // Absence of content is never flagged as a copy
            info!(
                address = %candidate,
                "Candidate content empty or unavailable, admitting without comparison"
            );
            return SimilarityVerdict::clear();
        }
        let candidate_text = candidate_content.text();

        if existing.is_empty() {
            return SimilarityVerdict::clear();
        }

        // Batch phase: fetch every existing work through a bounded pool.
        // `buffered` keeps results in input order; individual failures
        // surface as empty content without aborting the batch.
        let fetched: Vec<(String, FetchedContent)> = stream::iter(existing.iter().cloned())
            .map(|address| {
                let source = Arc::clone(&self.source);
                async move {
                    let content = source.fetch(&address).await;
                    (address, content)
                }
            })
            .buffered(self.config.fetch_concurrency)
            .collect()
            .await;

        // Scoring phase: first pair over the threshold wins
        for (address, content) in fetched {
            if content.is_empty() {
                continue;
            }

            let similarity = scorer::score(candidate_text, content.text());
            debug!(
                candidate = %candidate,
                existing = %address,
                similarity,
                "Scored pair"
            );

            if similarity >= self.config.threshold {
                info!(
                    candidate = %candidate,
                    matched = %address,
                    similarity,
                    "Duplicate detected"
                );
                return SimilarityVerdict::copied(address, similarity);
            }
        }

        SimilarityVerdict::clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory content source that records every fetched address
    struct MapSource {
        contents: HashMap<String, FetchedContent>,
        fetched: Mutex<Vec<String>>,
    }

    impl MapSource {
        fn new(entries: &[(&str, FetchedContent)]) -> Arc<Self> {
            Arc::new(Self {
                contents: entries
                    .iter()
                    .map(|(addr, content)| (addr.to_string(), content.clone()))
                    .collect(),
                fetched: Mutex::new(Vec::new()),
            })
        }

        fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentSource for MapSource {
        async fn fetch(&self, address: &str) -> FetchedContent {
            self.fetched.lock().unwrap().push(address.to_string());
            self.contents
                .get(address)
                .cloned()
                .unwrap_or(FetchedContent::Unavailable {
                    reason: "not found".to_string(),
                })
        }
    }

    fn available(text: &str) -> FetchedContent {
        FetchedContent::Available(text.to_string())
    }

    fn gate(source: Arc<MapSource>) -> DuplicateGate {
        DuplicateGate::new(source, GateConfig::default())
    }

    fn addresses(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_existing_set_is_clear() {
        let source = MapSource::new(&[("cand", available("some creative text"))]);
        let verdict = gate(Arc::clone(&source)).check("cand", &[]).await;

        assert!(!verdict.copied);
        assert_eq!(verdict.match_address, None);
        // Only the candidate itself was fetched
        assert_eq!(source.fetched(), vec!["cand"]);
    }

    #[tokio::test]
    async fn test_unavailable_candidate_is_clear_without_batch_fetch() {
        let source = MapSource::new(&[("h1", available("existing text"))]);
        let verdict = gate(Arc::clone(&source))
            .check("cand", &addresses(&["h1"]))
            .await;

        assert!(!verdict.copied);
        // The batch phase never ran
        assert_eq!(source.fetched(), vec!["cand"]);
    }

    #[tokio::test]
    async fn test_empty_candidate_content_is_clear() {
        let source = MapSource::new(&[("cand", available("")), ("h1", available("existing"))]);
        let verdict = gate(Arc::clone(&source))
            .check("cand", &addresses(&["h1"]))
            .await;

        assert!(!verdict.copied);
        assert_eq!(source.fetched(), vec!["cand"]);
    }

    #[tokio::test]
    async fn test_first_match_over_threshold_wins() {
        let text = "the quick brown fox jumps over the lazy dog";
        let source = MapSource::new(&[
            ("cand", available(text)),
            ("h1", available("entirely unrelated words in this one")),
            ("h2", available(text)),
            ("h3", available(text)),
        ]);
        let verdict = gate(Arc::clone(&source))
            .check("cand", &addresses(&["h1", "h2", "h3"]))
            .await;

        assert!(verdict.copied);
        // h1 scored below threshold, scan continued to h2 and stopped there
        assert_eq!(verdict.match_address.as_deref(), Some("h2"));
        assert!(verdict.similarity.unwrap() >= 80.0);

        // The batch fetch still covered every existing address
        let mut fetched = source.fetched();
        fetched.sort();
        assert_eq!(fetched, vec!["cand", "h1", "h2", "h3"]);
    }

    #[tokio::test]
    async fn test_unavailable_existing_entries_are_skipped() {
        let text = "a work of considerable originality";
        let source = MapSource::new(&[
            ("cand", available(text)),
            // h1 missing from the map: fetch degrades to unavailable
            ("h2", available(text)),
        ]);
        let verdict = gate(Arc::clone(&source))
            .check("cand", &addresses(&["h1", "h2"]))
            .await;

        assert!(verdict.copied);
        assert_eq!(verdict.match_address.as_deref(), Some("h2"));
    }

    #[tokio::test]
    async fn test_all_below_threshold_is_clear() {
        let source = MapSource::new(&[
            ("cand", available("completely novel writing with its own words")),
            ("h1", available("unrelated subject matter altogether")),
            ("h2", available("different text again")),
        ]);
        let verdict = gate(Arc::clone(&source))
            .check("cand", &addresses(&["h1", "h2"]))
            .await;

        assert!(!verdict.copied);
        assert_eq!(verdict.match_address, None);
        assert_eq!(verdict.similarity, None);
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        // abcdef/abcdex score exactly 80%
        let source = MapSource::new(&[("cand", available("abcdef")), ("h1", available("abcdex"))]);
        let verdict = gate(Arc::clone(&source))
            .check("cand", &addresses(&["h1"]))
            .await;

        assert!(verdict.copied);
        assert!((verdict.similarity.unwrap() - 80.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_bounded_concurrency_preserves_input_order() {
        let text = "shared text for the ordering check";
        let mut entries = vec![("cand", available(text))];
        let existing: Vec<String> = (0..20).map(|i| format!("h{:02}", i)).collect();
        let leaked: Vec<&'static str> = existing
            .iter()
            .map(|s| Box::leak(s.clone().into_boxed_str()) as &str)
            .collect();
        for addr in &leaked {
            // Only the last entry matches; everything before scores 0
            let content = if *addr == "h19" {
                available(text)
            } else {
                available("zzzz")
            };
            entries.push((*addr, content));
        }

        let source = MapSource::new(&entries);
        let gate = DuplicateGate::new(
            Arc::clone(&source) as Arc<dyn ContentSource>,
            GateConfig {
                threshold: 80.0,
                fetch_concurrency: 3,
            },
        );
        let verdict = gate.check("cand", &existing).await;

        assert!(verdict.copied);
        assert_eq!(verdict.match_address.as_deref(), Some("h19"));
    }
}
