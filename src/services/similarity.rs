//! Similarity provider
//!
//! Either wraps a precomputed matrix or derives one from tag text: tags are
//! tokenized into a bag of words over a capped vocabulary of the most
//! frequent non-stop-word terms, then compared pairwise by cosine similarity.
use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::error::{AppError, AppResult};

/// English stop words dropped before counting terms
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amoungst",
    "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere",
    "are", "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "bill", "both", "bottom", "but", "by", "call", "can", "cannot", "cant", "co", "con",
    "could", "couldnt", "cry", "de", "describe", "detail", "do", "done", "down", "due", "during",
    "each", "eg", "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc",
    "even", "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found",
    "four", "from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt", "have",
    "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself",
    "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed",
    "interest", "into", "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least",
    "less", "ltd", "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely",
    "neither", "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed", "seeming",
    "seems", "serious", "several", "she", "should", "show", "side", "since", "sincere", "six",
    "sixty", "so", "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
    "still", "such", "system", "take", "ten", "than", "that", "the", "their", "them", "themselves",
    "then", "thence", "there", "thereafter", "thereby", "therefore", "therein", "thereupon",
    "these", "they", "thick", "thin", "third", "this", "those", "though", "three", "through",
    "throughout", "thru", "thus", "to", "together", "too", "top", "toward", "towards", "twelve",
    "twenty", "two", "un", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well",
    "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
    "you", "your", "yours", "yourself", "yourselves",
];

/// Dense, row-major N×N similarity matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds a matrix from rows, which must form a square of finite values
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(AppError::DataLoad(format!(
                    "Similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(AppError::DataLoad(format!(
                    "Similarity matrix has a non-finite value at row {}, column {}",
                    i, j
                )));
            }
            values.extend(row);
        }

        Ok(Self { size, values })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Row `i`; panics if out of range
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.size + j]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact(0) panics
        self.values.chunks_exact(self.size.max(1))
    }
}

/// Bag-of-words term counter with a capped vocabulary
pub struct CountVectorizer {
    max_features: usize,
    token_pattern: Regex,
    stop_words: HashSet<&'static str>,
}

/// Sparse term-count vector, sorted by vocabulary index
pub type SparseVector = Vec<(usize, f32)>;

impl CountVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            token_pattern: Regex::new(r"\b\w\w+\b").expect("static token pattern is valid"),
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Lowercased tokens of two or more word characters, stop words removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }

    /// Vocabulary of the `max_features` most frequent terms across `documents`
    ///
    /// Frequency ties are broken alphabetically; the returned map assigns
    /// column indices in alphabetical order.
    pub fn build_vocabulary(&self, documents: &[Vec<String>]) -> HashMap<String, usize> {
        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for tokens in documents {
            for token in tokens {
                *frequencies.entry(token.as_str()).or_default() += 1;
            }
        }

        let mut terms: Vec<(&str, usize)> = frequencies.into_iter().collect();
        terms.sort_by(|(a_term, a_count), (b_term, b_count)| {
            b_count.cmp(a_count).then_with(|| a_term.cmp(b_term))
        });
        terms.truncate(self.max_features);

        let mut kept: Vec<&str> = terms.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();

        kept.into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect()
    }

    fn vectorize(&self, tokens: &[String], vocabulary: &HashMap<String, usize>) -> SparseVector {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for token in tokens {
            if let Some(&index) = vocabulary.get(token) {
                *counts.entry(index).or_default() += 1.0;
            }
        }

        let mut vector: SparseVector = counts.into_iter().collect();
        vector.sort_unstable_by_key(|(index, _)| *index);
        vector
    }

    /// Term-count vectors for every document
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> AppResult<Vec<SparseVector>> {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.tokenize(doc.as_ref()))
            .collect();

        let vocabulary = self.build_vocabulary(&tokenized);
        if vocabulary.is_empty() {
            return Err(AppError::EmptyVocabulary);
        }

        tracing::debug!(
            documents = documents.len(),
            vocabulary = vocabulary.len(),
            "Vectorized tag text"
        );

        Ok(tokenized
            .iter()
            .map(|tokens| self.vectorize(tokens, &vocabulary))
            .collect())
    }
}

fn dot(a: &SparseVector, b: &SparseVector) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;

    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    sum
}

/// Pairwise cosine similarity of sparse vectors
///
/// The diagonal is 1.0 for non-zero vectors and 0.0 for all-zero vectors
/// (whose whole row is then zero), so it is always the row maximum.
pub fn cosine_similarity_matrix(vectors: &[SparseVector]) -> SimilarityMatrix {
    let size = vectors.len();
    let norms: Vec<f32> = vectors.iter().map(|v| dot(v, v).sqrt()).collect();
    let mut values = vec![0.0f32; size * size];

    for i in 0..size {
        if norms[i] > 0.0 {
            values[i * size + i] = 1.0;
        }

        for j in (i + 1)..size {
            if norms[i] == 0.0 || norms[j] == 0.0 {
                continue;
            }
            let score = (dot(&vectors[i], &vectors[j]) / (norms[i] * norms[j])).clamp(0.0, 1.0);
            values[i * size + j] = score;
            values[j * size + i] = score;
        }
    }

    SimilarityMatrix { size, values }
}

/// Derives the similarity matrix from one tag string per movie
pub fn compute_from_tags<S: AsRef<str>>(
    tags: &[S],
    max_features: usize,
) -> AppResult<SimilarityMatrix> {
    let vectorizer = CountVectorizer::new(max_features);
    let vectors = vectorizer.fit_transform(tags)?;
    let matrix = cosine_similarity_matrix(&vectors);

    tracing::info!(
        movies = matrix.len(),
        max_features = max_features,
        "Computed similarity matrix from tags"
    );

    Ok(matrix)
}
