//! The in-memory flat cosine index.

use cognate_core::errors::{CognateResult, IndexError};

/// One query result: record id plus cosine similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub record_id: String,
    pub similarity: f32,
}

/// blake3 over id-ordered (id, vector bytes) pairs. Tags an index with
/// the exact vector set it was built from.
pub fn vector_set_hash(ids: &[String], vectors: &[Vec<f32>]) -> String {
    let mut hasher = blake3::Hasher::new();
    for (id, vector) in ids.iter().zip(vectors) {
        hasher.update(id.as_bytes());
        hasher.update(b"\0");
        for value in vector {
            hasher.update(&value.to_le_bytes());
        }
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

/// A flat index over L2-normalized vectors. Inner product == cosine.
#[derive(Debug, Clone)]
pub struct IndexHandle {
    model_id: String,
    dims: usize,
    /// Ascending record ids, parallel to `vectors`.
    ids: Vec<String>,
    vectors: Vec<Vec<f32>>,
    tag: String,
}

impl IndexHandle {
    /// Build an index from id-ordered entries.
    ///
    /// Entries must arrive sorted by ascending id (the corpus order);
    /// the build re-sorts defensively-free: it verifies and rejects
    /// unsorted input instead of silently reordering.
    pub fn build(
        model_id: &str,
        ids: Vec<String>,
        vectors: Vec<Vec<f32>>,
    ) -> CognateResult<Self> {
        if ids.len() != vectors.len() {
            return Err(IndexError::BuildFailed {
                reason: format!("{} ids but {} vectors", ids.len(), vectors.len()),
            }
            .into());
        }
        if ids.windows(2).any(|w| w[0] >= w[1]) {
            return Err(IndexError::BuildFailed {
                reason: "entries not strictly sorted by id".to_string(),
            }
            .into());
        }
        let dims = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dims) {
            return Err(IndexError::BuildFailed {
                reason: format!("ragged vector set: expected {dims} dims, found {}", bad.len()),
            }
            .into());
        }

        let tag = vector_set_hash(&ids, &vectors);
        Ok(Self {
            model_id: model_id.to_string(),
            dims,
            ids,
            vectors,
            tag,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The vector-set hash this index was built from.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub(crate) fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Top-k by cosine similarity, descending; ties break by ascending
    /// record id. `k` larger than the index returns every entry, sorted,
    /// without error.
    pub fn query(&self, query: &[f32], k: usize) -> CognateResult<Vec<QueryHit>> {
        if self.dims != 0 && query.len() != self.dims {
            return Err(IndexError::DimensionMismatch {
                expected: self.dims,
                actual: query.len(),
            }
            .into());
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<QueryHit> = self
            .ids
            .iter()
            .zip(&self.vectors)
            .map(|(id, vector)| QueryHit {
                record_id: id.clone(),
                similarity: vector.iter().zip(query).map(|(a, b)| a * b).sum(),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.record_id.cmp(&b.record_id))
        });
        hits.truncate(k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(dims: usize, hot: usize) -> Vec<f32> {
        let mut v = vec![0.0; dims];
        v[hot] = 1.0;
        v
    }

    fn build_basis(n: usize) -> IndexHandle {
        let ids: Vec<String> = (0..n).map(|i| format!("id:{i:03}")).collect();
        let vectors: Vec<Vec<f32>> = (0..n).map(|i| unit(n, i)).collect();
        IndexHandle::build("BAAI/bge-m3", ids, vectors).unwrap()
    }

    #[test]
    fn exact_match_ranks_first() {
        let index = build_basis(10);
        let hits = index.query(&unit(10, 4), 3).unwrap();
        assert_eq!(hits[0].record_id, "id:004");
        assert!((hits[0].similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn k_larger_than_index_returns_all_sorted() {
        let index = build_basis(5);
        let hits = index.query(&unit(5, 0), 50).unwrap();
        assert_eq!(hits.len(), 5);
        for pair in hits.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn ties_break_by_ascending_id() {
        // "b" and "c" carry identical vectors → identical similarity.
        let index = IndexHandle::build(
            "m",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0]],
        )
        .unwrap();

        let hits = index.query(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].record_id, "b");
        assert_eq!(hits[1].record_id, "c");
    }

    #[test]
    fn unsorted_ids_rejected() {
        let err = IndexHandle::build(
            "m",
            vec!["b".to_string(), "a".to_string()],
            vec![vec![1.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("sorted"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = IndexHandle::build(
            "m",
            vec!["a".to_string(), "a".to_string()],
            vec![vec![1.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("sorted"));
    }

    #[test]
    fn ragged_vectors_rejected() {
        let err = IndexHandle::build(
            "m",
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 0.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("ragged"));
    }

    #[test]
    fn dimension_mismatch_on_query() {
        let index = build_basis(4);
        let err = index.query(&[1.0, 0.0], 2).unwrap_err();
        assert!(err.to_string().contains("dims"));
    }

    #[test]
    fn k_zero_returns_empty() {
        let index = build_basis(4);
        assert!(index.query(&unit(4, 0), 0).unwrap().is_empty());
    }

    #[test]
    fn tag_changes_with_vectors() {
        let a = IndexHandle::build("m", vec!["a".to_string()], vec![vec![1.0, 0.0]]).unwrap();
        let b = IndexHandle::build("m", vec!["a".to_string()], vec![vec![0.0, 1.0]]).unwrap();
        assert_ne!(a.tag(), b.tag());
    }

    #[test]
    fn query_is_deterministic() {
        let index = build_basis(8);
        let q = vec![0.5f32; 8];
        assert_eq!(index.query(&q, 8).unwrap(), index.query(&q, 8).unwrap());
    }
}
