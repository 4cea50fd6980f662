//! Embedding provider — the single point of entry for text vectorization.
//!
//! All similarity in the service flows through `EmbeddingProvider`: one
//! whole-batch call per request with every input assembled up front, so the
//! only suspension point on the scoring path is this call boundary. A
//! provider failure is a typed error surfaced to the caller; it is never
//! silently defaulted, since a fabricated similarity would corrupt the
//! compatibility score downstream.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Dimension of the local fallback embedder.
pub const HASH_DIM: usize = 128;

/// Guard against division by zero in cosine similarity.
const COSINE_EPS: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding API returned {got} vectors for {expected} inputs")]
    ShapeMismatch { expected: usize, got: usize },
}

/// Produces fixed-dimension vectors for two corpora in one batch call.
/// Outputs are equal-length with their inputs and in the same order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_corpus(
        &self,
        candidate_texts: &[String],
        job_texts: &[String],
    ) -> Result<(Vec<Vec<f32>>, Vec<Vec<f32>>), EmbeddingError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP-backed provider
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Client for an external sentence-embedding service. The whole corpus goes
/// out in a single request; the configured timeout bounds the call. No
/// internal retry — callers own backoff policy.
pub struct HttpEmbeddingProvider {
    client: Client,
    endpoint: String,
}

impl HttpEmbeddingProvider {
    pub fn new(endpoint: String, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_corpus(
        &self,
        candidate_texts: &[String],
        job_texts: &[String],
    ) -> Result<(Vec<Vec<f32>>, Vec<Vec<f32>>), EmbeddingError> {
        let mut texts = Vec::with_capacity(candidate_texts.len() + job_texts.len());
        texts.extend_from_slice(candidate_texts);
        texts.extend_from_slice(job_texts);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { texts: &texts })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbedResponse = response.json().await?;
        if body.embeddings.len() != texts.len() {
            return Err(EmbeddingError::ShapeMismatch {
                expected: texts.len(),
                got: body.embeddings.len(),
            });
        }

        debug!(
            "embedded {} candidate and {} job texts",
            candidate_texts.len(),
            job_texts.len()
        );

        let mut embeddings = body.embeddings;
        let jobs = embeddings.split_off(candidate_texts.len());
        Ok((embeddings, jobs))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Deterministic local fallback
// ────────────────────────────────────────────────────────────────────────────

/// Term-frequency hashing embedder: each token is hashed into a fixed
/// 128-dimension bucket and the vector is L2-normalized. Deterministic and
/// infallible, which makes it the default provider when no external
/// endpoint is configured, and the provider used by tests.
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; HASH_DIM];
        for token in text.split_whitespace() {
            let bucket = fnv1a(token) as usize % HASH_DIM;
            v[bucket] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed_corpus(
        &self,
        candidate_texts: &[String],
        job_texts: &[String],
    ) -> Result<(Vec<Vec<f32>>, Vec<Vec<f32>>), EmbeddingError> {
        let cvs = candidate_texts.iter().map(|t| self.embed_one(t)).collect();
        let jds = job_texts.iter().map(|t| self.embed_one(t)).collect();
        Ok((cvs, jds))
    }
}

/// FNV-1a, 64-bit. Stable across runs and platforms, which keeps the local
/// embedder deterministic.
fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in s.as_bytes() {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

// ────────────────────────────────────────────────────────────────────────────
// Similarity
// ────────────────────────────────────────────────────────────────────────────

/// Cosine similarity rescaled from [-1, 1] to [0, 1]. Zero-norm vectors
/// yield 0.5 (a raw cosine of 0); non-finite results map to 0.0.
pub fn similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();
    let cos = dot / (norm_a * norm_b + COSINE_EPS);
    if !cos.is_finite() {
        return 0.0;
    }
    ((cos + 1.0) / 2.0).clamp(0.0, 1.0)
}
