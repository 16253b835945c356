use std::collections::{BTreeMap, BTreeSet};
use std::convert::TryFrom;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use log::debug;

use super::error::ClassifierError;
use super::utils::{ngrams, normalize_text, word_tokens};

/// Maps each n-gram seen at training time to a unique column index.
///
/// Terms are kept in lexicographic order and a term's index is its position,
/// so every index in `[0, len)` belongs to exactly one term and the same
/// corpus always yields the same mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    fn from_sorted(terms: BTreeSet<String>) -> Self {
        Self { terms: terms.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column index of `term`, or `None` when it is out of vocabulary
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// SHA-256 over the ordered terms. Two vocabularies with the same
    /// fingerprint assign identical indices.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for term in &self.terms {
            hasher.update(term.as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = ClassifierError;

    fn try_from(terms: Vec<String>) -> Result<Self, Self::Error> {
        if let Some(pos) = terms.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ClassifierError::ValidationError(format!(
                "Vocabulary terms must be unique and sorted (offending term at index {})",
                pos + 1
            )));
        }
        Ok(Self { terms })
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

/// Sparse term counts for one text, `width` columns wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    width: usize,
    // (column, count), sorted by column, counts > 0
    entries: Vec<(usize, u32)>,
}

impl FeatureVector {
    /// An all-zero vector of the given width
    pub fn zeros(width: usize) -> Self {
        Self { width, entries: Vec::new() }
    }

    /// Builds a vector from (column, count) pairs. Repeated columns are
    /// summed and zero counts dropped.
    pub fn from_counts(
        width: usize,
        counts: impl IntoIterator<Item = (usize, u32)>,
    ) -> Result<Self, ClassifierError> {
        let mut merged: BTreeMap<usize, u32> = BTreeMap::new();
        for (column, count) in counts {
            if column >= width {
                return Err(ClassifierError::ValidationError(format!(
                    "Feature column {} out of range for width {}",
                    column, width
                )));
            }
            *merged.entry(column).or_insert(0) += count;
        }
        Ok(Self {
            width,
            entries: merged.into_iter().filter(|&(_, c)| c > 0).collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// True when no vocabulary term occurred in the text
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column: usize) -> u32 {
        self.entries
            .binary_search_by_key(&column, |&(c, _)| c)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Non-zero (column, count) pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, c)| c as u64).sum()
    }

    pub fn to_dense(&self) -> Array1<f64> {
        let mut dense = Array1::zeros(self.width);
        for &(column, count) in &self.entries {
            dense[column] = count as f64;
        }
        dense
    }
}

/// Tokenization options for [`CountVectorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Inclusive range of n-gram sizes to extract
    pub ngram_range: (usize, usize),
    pub lowercase: bool,
    pub strip_accents: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            lowercase: true,
            strip_accents: true,
        }
    }
}

/// Bag-of-n-grams vectorizer.
///
/// ```
/// use profile_router::CountVectorizer;
///
/// let mut vectorizer = CountVectorizer::new();
/// vectorizer.fit(&["hello there", "thank you"]).unwrap();
/// let features = vectorizer.transform_one("Hello THERE friend").unwrap();
/// assert_eq!(features.total(), 3); // "hello", "there", "hello there"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountVectorizer {
    config: VectorizerConfig,
    vocabulary: Option<Vocabulary>,
}

impl CountVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VectorizerConfig) -> Self {
        Self { config, vocabulary: None }
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.config.ngram_range = (min_n, max_n);
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.config.lowercase = lowercase;
        self
    }

    pub fn with_strip_accents(mut self, strip_accents: bool) -> Self {
        self.config.strip_accents = strip_accents;
        self
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Splits text into the n-gram terms the vocabulary is built from.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let normalized = normalize_text(text, self.config.lowercase, self.config.strip_accents);
        let tokens = word_tokens(&normalized);
        ngrams(&tokens, self.config.ngram_range)
    }

    fn validate_config(&self) -> Result<(), ClassifierError> {
        let (min_n, max_n) = self.config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::ValidationError(format!(
                "Invalid n-gram range ({}, {})",
                min_n, max_n
            )));
        }
        Ok(())
    }

    /// Learns the vocabulary from `corpus`, replacing any previous one.
    ///
    /// # Errors
    /// - `ValidationError` if the corpus is empty or the n-gram range is invalid
    /// - `BuildError` if the corpus yields no terms at all
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) -> Result<&Vocabulary, ClassifierError> {
        self.validate_config()?;
        if corpus.is_empty() {
            return Err(ClassifierError::ValidationError("Cannot fit on an empty corpus".into()));
        }

        let terms: BTreeSet<String> = corpus
            .iter()
            .flat_map(|doc| self.analyze(doc.as_ref()))
            .collect();
        if terms.is_empty() {
            return Err(ClassifierError::BuildError(
                "Empty vocabulary: the corpus contains no usable tokens".into(),
            ));
        }

        debug!("Fitted vocabulary with {} terms from {} documents", terms.len(), corpus.len());
        Ok(&*self.vocabulary.insert(Vocabulary::from_sorted(terms)))
    }

    pub fn fit_transform<S: AsRef<str>>(
        &mut self,
        corpus: &[S],
    ) -> Result<Vec<FeatureVector>, ClassifierError> {
        self.fit(corpus)?;
        self.transform(corpus)
    }

    /// Counts vocabulary terms in each text. Out-of-vocabulary terms are ignored.
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<FeatureVector>, ClassifierError> {
        texts.iter().map(|text| self.transform_one(text.as_ref())).collect()
    }

    pub fn transform_one(&self, text: &str) -> Result<FeatureVector, ClassifierError> {
        let vocabulary = self.vocabulary.as_ref().ok_or_else(|| {
            ClassifierError::NotFitted("Vectorizer must be fitted before transform".into())
        })?;
        let terms = self.analyze(text);
        let counts = terms
            .iter()
            .filter_map(|term| vocabulary.index_of(term))
            .map(|column| (column, 1));
        FeatureVector::from_counts(vocabulary.len(), counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(corpus: &[&str]) -> CountVectorizer {
        let mut vectorizer = CountVectorizer::new();
        vectorizer.fit(corpus).unwrap();
        vectorizer
    }

    #[test]
    fn test_vocabulary_is_sorted_and_dense() {
        let vectorizer = fitted(&["where are you from", "where do you live"]);
        let vocabulary = vectorizer.vocabulary().unwrap();
        let terms: Vec<&str> = vocabulary.terms().collect();
        let mut sorted = terms.clone();
        sorted.sort();
        assert_eq!(terms, sorted);
        for (i, term) in terms.iter().enumerate() {
            assert_eq!(vocabulary.index_of(term), Some(i));
        }
        assert!(vocabulary.index_of("where are").is_some());
        assert!(vocabulary.index_of("are you").is_some());
        assert_eq!(vocabulary.index_of("from where"), None);
    }

    #[test]
    fn test_same_corpus_same_vocabulary() {
        let corpus = ["hi", "hello", "good morning", "thank you"];
        let a = fitted(&corpus);
        let mut reversed = corpus;
        reversed.reverse();
        let b = fitted(&reversed);
        assert_eq!(a.vocabulary(), b.vocabulary());
        assert_eq!(
            a.vocabulary().unwrap().fingerprint(),
            b.vocabulary().unwrap().fingerprint()
        );
    }

    #[test]
    fn test_transform_before_fit() {
        let vectorizer = CountVectorizer::new();
        assert!(matches!(
            vectorizer.transform_one("hello"),
            Err(ClassifierError::NotFitted(_))
        ));
    }

    #[test]
    fn test_fit_empty_corpus() {
        let mut vectorizer = CountVectorizer::new();
        let empty: [&str; 0] = [];
        assert!(vectorizer.fit(&empty).is_err());
        assert!(vectorizer.fit(&["?", "a"]).is_err());
    }

    #[test]
    fn test_out_of_vocabulary_is_zero() {
        let vectorizer = fitted(&["hello there"]);
        let features = vectorizer.transform_one("xyzzy plugh").unwrap();
        assert!(features.is_zero());
        assert_eq!(features.width(), 3);
        assert!(vectorizer.transform_one("").unwrap().is_zero());
    }

    #[test]
    fn test_counts_repeated_terms() {
        let vectorizer = fitted(&["thank you"]);
        let vocabulary = vectorizer.vocabulary().unwrap();
        let features = vectorizer.transform_one("thank you, thank you!").unwrap();
        assert_eq!(features.get(vocabulary.index_of("thank").unwrap()), 2);
        assert_eq!(features.get(vocabulary.index_of("thank you").unwrap()), 2);
        assert_eq!(features.get(vocabulary.index_of("you").unwrap()), 2);
        assert_eq!(features.total(), 6);
    }

    #[test]
    fn test_case_and_accents_are_normalized() {
        let vectorizer = fitted(&["cafe resume"]);
        let a = vectorizer.transform_one("Café Résumé").unwrap();
        let b = vectorizer.transform_one("cafe resume").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total(), 3);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let vectorizer = fitted(&["tell me about your education", "education"]);
        let first = vectorizer.transform(&["tell me about education"]).unwrap();
        let second = vectorizer.transform(&["tell me about education"]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_ngram_range() {
        let mut vectorizer = CountVectorizer::new().with_ngram_range(2, 1);
        assert!(matches!(
            vectorizer.fit(&["hello there"]),
            Err(ClassifierError::ValidationError(_))
        ));
    }

    #[test]
    fn test_vocabulary_rejects_unsorted_terms() {
        assert!(Vocabulary::try_from(vec!["b".to_string(), "a".to_string()]).is_err());
        assert!(Vocabulary::try_from(vec!["a".to_string(), "a".to_string()]).is_err());
        assert!(Vocabulary::try_from(vec!["a".to_string(), "b".to_string()]).is_ok());
    }

    #[test]
    fn test_feature_vector_from_counts() {
        let features = FeatureVector::from_counts(4, vec![(2, 1), (0, 3), (2, 2), (1, 0)]).unwrap();
        assert_eq!(features.iter().collect::<Vec<_>>(), vec![(0, 3), (2, 3)]);
        assert_eq!(features.to_dense().to_vec(), vec![3.0, 0.0, 3.0, 0.0]);
        assert!(FeatureVector::from_counts(2, vec![(2, 1)]).is_err());
    }
}
