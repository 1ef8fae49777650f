//! Feature engineering
//!
//! Turns character records into numeric feature vectors for the predictors.
//! Two representations exist:
//!
//! - TF-IDF over the powers free text (role classification)
//! - one-hot over `{role label, power level}` plus standardization
//!   (power regression)
//!
//! Feature identity — the ordered list of column names — is fixed when a
//! vectorizer or encoder is fitted and must be reused verbatim for every
//! later transform. The fitted state serializes as part of a model bundle.

mod encode;
mod tfidf;

pub use encode::{CategoricalEncoder, StandardScaler};
pub use tfidf::{is_stop_word, tokenize, TfidfVectorizer};
