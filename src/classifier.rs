//! Two-class Naive Bayes scoring.
//!
//! # Scoring
//!
//! For every token of the query document, and independently for each class:
//!
//! - if the class has seen the token fewer than `threshold` times, the score
//!   gains `ln(count / class_word_count)`;
//! - otherwise (never seen, or seen `threshold` times or more) the score gains
//!   exactly [`UNSCORED_WEIGHT`].
//!
//! The second rule is a fixed bonus, not a probability: a class treats its
//! stopword-frequency words exactly like words it has never seen.
//!
//! After the token loop each class adds its log prior once, and the document
//! is spam only if the spam score is strictly greater than the ham score.

use crate::corpus::ClassStats;
use crate::error::{NbcError, Result};
use crate::frequency::WordCounts;
use crate::tokenizer::tokenize;
use std::fmt;
use tracing::{debug, trace};

/// Default stopword cutoff: words seen this many times or more in a class are
/// not scored for that class.
pub const DEFAULT_THRESHOLD: u32 = 150;

/// Added to a class score for a word that is unseen or at/above the threshold.
pub const UNSCORED_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ham,
    Spam,
}

impl Verdict {
    pub fn is_spam(self) -> bool {
        self == Verdict::Spam
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Ham => f.write_str("is NOT a spam"),
            Verdict::Spam => f.write_str("is a SPAM"),
        }
    }
}

/// Class priors derived from document counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Priors {
    pub total_docs: u64,
    pub ham: f64,
    pub spam: f64,
}

impl Priors {
    /// `total = ham_docs + spam_docs`. Both classes need at least one
    /// document, otherwise a log prior would be `-inf`.
    pub fn new(ham_docs: u64, spam_docs: u64) -> Result<Self> {
        let total_docs = ham_docs + spam_docs;
        if total_docs == 0 {
            return Err(NbcError::degenerate("no training documents in either class"));
        }
        if ham_docs == 0 {
            return Err(NbcError::degenerate("ham corpus has no documents"));
        }
        if spam_docs == 0 {
            return Err(NbcError::degenerate("spam corpus has no documents"));
        }

        Ok(Self {
            total_docs,
            ham: ham_docs as f64 / total_docs as f64,
            spam: spam_docs as f64 / total_docs as f64,
        })
    }
}

/// Outcome of classifying one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub verdict: Verdict,
    pub priors: Priors,
    /// ln P(H|D), up to the shared evidence term.
    pub ham_score: f64,
    /// ln P(S|D), up to the shared evidence term.
    pub spam_score: f64,
    pub tokens: u64,
}

/// Scores documents against trained ham/spam statistics.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    threshold: u32,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Classifier {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Contribution of one token to one class score.
    pub fn token_weight(&self, word: &[u8], class: &ClassStats) -> Result<f64> {
        match class.table.count(word) {
            Some(count) if count < self.threshold => {
                if class.word_count == 0 {
                    return Err(NbcError::degenerate(
                        "class word count is zero but its table is not empty",
                    ));
                }
                Ok((f64::from(count) / class.word_count as f64).ln())
            }
            _ => Ok(UNSCORED_WEIGHT),
        }
    }

    /// Classify `document` against the two trained classes.
    pub fn classify(&self, document: &[u8], ham: &ClassStats, spam: &ClassStats) -> Result<Classification> {
        let priors = Priors::new(ham.doc_count, spam.doc_count)?;

        let mut ham_score = 0.0;
        let mut spam_score = 0.0;
        let mut tokens = 0u64;
        for token in tokenize(document) {
            let word = token.as_bytes();
            let ham_weight = self.token_weight(word, ham)?;
            let spam_weight = self.token_weight(word, spam)?;
            trace!(offset = token.offset(), len = token.len(), %token, ham_weight, spam_weight, "token scored");
            ham_score += ham_weight;
            spam_score += spam_weight;
            tokens += 1;
        }

        ham_score += priors.ham.ln();
        spam_score += priors.spam.ln();

        let verdict = if spam_score > ham_score {
            Verdict::Spam
        } else {
            Verdict::Ham
        };
        debug!(tokens, ham_score, spam_score, ?verdict, "document scored");

        Ok(Classification {
            verdict,
            priors,
            ham_score,
            spam_score,
            tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(docs: &[&str]) -> ClassStats {
        let mut stats = ClassStats::new();
        for doc in docs {
            stats.add_document(doc.as_bytes());
        }
        stats
    }

    /// A class whose table holds `word` exactly `count` times out of
    /// `count + filler` tokens.
    fn stats_with_count(word: &str, count: usize, filler: usize) -> ClassStats {
        let mut body = format!("{word} ").repeat(count);
        body.push_str(&"filler ".repeat(filler));
        stats(&[&body])
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_end_to_end_buy_now_money() {
        let ham = stats(&["buy now"]);
        let spam = stats(&["buy now money now"]);

        assert_eq!((ham.word_count, ham.doc_count), (2, 1));
        assert_eq!(ham.table.count(b"buy"), Some(1));
        assert_eq!(ham.table.count(b"now"), Some(1));
        assert_eq!((spam.word_count, spam.doc_count), (4, 1));
        assert_eq!(spam.table.count(b"buy"), Some(1));
        assert_eq!(spam.table.count(b"now"), Some(2));
        assert_eq!(spam.table.count(b"money"), Some(1));

        let result = Classifier::default().classify(b"money now", &ham, &spam).unwrap();

        // ham: "money" unseen (+1.0), "now" ln(1/2), prior ln(1/2)
        // spam: "money" ln(1/4), "now" ln(2/4), prior ln(1/2)
        let half = 0.5f64.ln();
        assert!(close(result.ham_score, 1.0 + half + half));
        assert!(close(result.spam_score, 0.25f64.ln() + half + half));

        // The unseen-word bonus goes to the class that lacks the word, so
        // "money" pulls this document towards ham.
        assert!(result.ham_score > result.spam_score);
        assert_eq!(result.verdict, Verdict::Ham);
        assert_eq!(result.tokens, 2);
    }

    #[test]
    fn test_word_only_in_ham_favours_spam() {
        let ham = stats(&["meeting tomorrow"]);
        let spam = stats(&["buy now money now"]);

        let result = Classifier::default().classify(b"meeting", &ham, &spam).unwrap();
        assert!(close(result.ham_score, 0.5f64.ln() + 0.5f64.ln()));
        assert!(close(result.spam_score, 1.0 + 0.5f64.ln()));
        assert_eq!(result.verdict, Verdict::Spam);
    }

    #[test]
    fn test_threshold_boundary() {
        let classifier = Classifier::new(150);

        let below = stats_with_count("w", 149, 51);
        let weight = classifier.token_weight(b"w", &below).unwrap();
        assert!(close(weight, (149.0f64 / 200.0).ln()));

        let at = stats_with_count("w", 150, 50);
        assert_eq!(classifier.token_weight(b"w", &at).unwrap(), UNSCORED_WEIGHT);

        assert_eq!(classifier.token_weight(b"absent", &at).unwrap(), UNSCORED_WEIGHT);
    }

    #[test]
    fn test_configurable_threshold() {
        let class = stats(&["a a a b"]);
        assert_eq!(Classifier::new(3).token_weight(b"a", &class).unwrap(), UNSCORED_WEIGHT);
        assert!(close(
            Classifier::new(4).token_weight(b"a", &class).unwrap(),
            (3.0f64 / 4.0).ln()
        ));
    }

    #[test]
    fn test_priors_use_both_classes() {
        let priors = Priors::new(3, 1).unwrap();
        assert_eq!(priors.total_docs, 4);
        assert_eq!(priors.ham, 0.75);
        assert_eq!(priors.spam, 0.25);
    }

    #[test]
    fn test_priors_added_once_after_tokens() {
        let ham = stats(&["x", "y", "z"]);
        let spam = stats(&["q"]);
        // Four unseen tokens: each class gains 4 * 1.0, plus one log prior.
        let result = Classifier::default().classify(b"a b c d", &ham, &spam).unwrap();
        assert!(close(result.ham_score, 4.0 + 0.75f64.ln()));
        assert!(close(result.spam_score, 4.0 + 0.25f64.ln()));
        assert_eq!(result.verdict, Verdict::Ham);
    }

    #[test]
    fn test_empty_document_decided_by_priors() {
        let ham = stats(&["a"]);
        let spam = stats(&["b", "c"]);

        let result = Classifier::default().classify(b"", &ham, &spam).unwrap();
        assert_eq!(result.tokens, 0);
        assert!(close(result.ham_score, (1.0f64 / 3.0).ln()));
        assert!(close(result.spam_score, (2.0f64 / 3.0).ln()));
        assert_eq!(result.verdict, Verdict::Spam);

        let result = Classifier::default().classify(b" \n ", &spam, &ham).unwrap();
        assert_eq!(result.verdict, Verdict::Ham);
    }

    #[test]
    fn test_tie_resolves_to_ham() {
        let ham = stats(&["same"]);
        let spam = stats(&["same"]);
        let result = Classifier::default().classify(b"same same", &ham, &spam).unwrap();
        assert_eq!(result.ham_score, result.spam_score);
        assert_eq!(result.verdict, Verdict::Ham);
    }

    #[test]
    fn test_zero_documents_is_degenerate() {
        let empty = ClassStats::new();
        let spam = stats(&["money"]);

        let err = Classifier::default().classify(b"money", &empty, &spam).unwrap_err();
        assert!(matches!(err, NbcError::DegenerateCorpus(_)));

        let err = Classifier::default().classify(b"money", &spam, &empty).unwrap_err();
        assert!(matches!(err, NbcError::DegenerateCorpus(_)));

        let err = Classifier::default().classify(b"", &empty, &ClassStats::new()).unwrap_err();
        assert!(matches!(err, NbcError::DegenerateCorpus(_)));
    }

    #[test]
    fn test_zero_word_count_with_entries_is_degenerate() {
        let mut broken = stats(&["word"]);
        broken.word_count = 0;
        let err = Classifier::default().token_weight(b"word", &broken).unwrap_err();
        assert!(matches!(err, NbcError::DegenerateCorpus(_)));
    }

    #[test]
    fn test_empty_class_documents_are_not_degenerate() {
        // Documents exist but hold no tokens; every lookup misses.
        let ham = stats(&["", "  "]);
        let spam = stats(&["cash"]);
        let result = Classifier::default().classify(b"cash", &ham, &spam).unwrap();
        assert!(result.ham_score.is_finite());
        assert!(result.spam_score.is_finite());
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Spam.to_string(), "is a SPAM");
        assert_eq!(Verdict::Ham.to_string(), "is NOT a spam");
        assert!(Verdict::Spam.is_spam());
        assert!(!Verdict::Ham.is_spam());
    }
}
