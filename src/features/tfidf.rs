//! TF-IDF vectorization of powers text
//!
//! Hand-rolled term-frequency / inverse-document-frequency weighting with a
//! fixed English stop-word list and a minimum document frequency cutoff.
//! IDF uses the smoothed form `ln((1 + n) / (1 + df)) + 1` and each document
//! vector is L2-normalized, so transforming the training documents again
//! reproduces the training matrix exactly.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Common English stop words excluded from the vocabulary.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "back", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during",
    "each", "even", "ever", "every", "few", "first", "for", "from", "further", "get", "had",
    "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "however", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "less",
    "like", "made", "many", "may", "me", "might", "more", "most", "much", "must", "my", "myself",
    "never", "no", "nor", "not", "now", "of", "off", "often", "on", "once", "one", "only", "or",
    "other", "our", "ours", "ourselves", "out", "over", "own", "per", "same", "she", "should",
    "since", "so", "some", "still", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "were", "what", "when",
    "where", "whether", "which", "while", "who", "whom", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Whether a token is on the stop-word list.
pub fn is_stop_word(token: &str) -> bool {
    stop_words().contains(token)
}

/// Lowercase and split text into word tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    let re = TOKEN_RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

    let lower = text.to_lowercase();
    re.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// A fitted TF-IDF vectorizer.
///
/// The vocabulary (term -> column index) and per-term IDF weights are fixed
/// at fit time; `transform` never grows the feature space. Serializes fully,
/// so a saved vectorizer keeps producing the exact training feature space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    min_df: usize,
    n_documents: usize,
}

impl TfidfVectorizer {
    /// Fit the vectorizer over a document collection.
    ///
    /// Stop words are dropped, as are terms appearing in fewer than `min_df`
    /// documents. Column order is the sorted term order, which makes the
    /// feature schema deterministic for a given corpus.
    pub fn fit(documents: &[&str], min_df: usize) -> Self {
        let stop = stop_words();
        let n = documents.len();

        // Document frequency per term
        let mut df: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let terms: HashSet<String> = tokenize(doc)
                .into_iter()
                .filter(|t| !stop.contains(t.as_str()))
                .collect();
            for term in terms {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        // Sorted surviving terms form the fixed schema
        let vocabulary: BTreeMap<String, usize> = df
            .iter()
            .filter(|(_, &count)| count >= min_df)
            .map(|(term, _)| term.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term, i))
            .collect();

        let mut idf = vec![0.0; vocabulary.len()];
        for (term, &idx) in &vocabulary {
            let term_df = df[term] as f64;
            idf[idx] = ((1.0 + n as f64) / (1.0 + term_df)).ln() + 1.0;
        }

        debug!(
            "Fitted TF-IDF vectorizer: {} documents, {} terms (min_df={})",
            n,
            vocabulary.len(),
            min_df
        );

        Self {
            vocabulary,
            idf,
            min_df,
            n_documents: n,
        }
    }

    /// Transform one document into a dense TF-IDF vector over the fitted
    /// schema. Unknown terms contribute nothing.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.vocabulary.len()];
        for token in tokenize(document) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                vector[idx] += 1.0;
            }
        }
        for (i, value) in vector.iter_mut().enumerate() {
            *value *= self.idf[i];
        }

        // L2 normalization
        let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }

    /// Transform a batch of documents.
    pub fn transform_all(&self, documents: &[&str]) -> Vec<Vec<f64>> {
        documents.iter().map(|d| self.transform(d)).collect()
    }

    /// The fixed, ordered feature schema.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![String::new(); self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            names[idx] = term.clone();
        }
        names
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn min_df(&self) -> usize {
        self.min_df
    }
}
