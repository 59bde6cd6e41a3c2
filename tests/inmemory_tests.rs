//! Tests for in-memory vector store ordering, counting, and reset.

use proptest::prelude::*;
use ragcore::error::RagError;
use ragcore::inmemory::InMemoryVectorStore;
use ragcore::vectorstore::VectorStore;

/// Generate an embedding of the given dimension.
fn arb_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim)
}

/// **Search ordering**: for any set of stored records, querying returns
/// results ordered by ascending L2 distance, truncated to `n_results`.
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_ascending_and_bounded_by_n_results(
            embeddings in proptest::collection::vec(arb_embedding(DIM), 1..20),
            query in arb_embedding(DIM),
            n_results in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async {
                let store = InMemoryVectorStore::new();
                let ids: Vec<String> =
                    (0..embeddings.len()).map(|i| format!("chunk_{i}")).collect();
                let texts: Vec<String> =
                    (0..embeddings.len()).map(|i| format!("text {i}")).collect();

                store.add(&ids, &texts, &embeddings).await.unwrap();
                store.query(&query, n_results).await.unwrap()
            });

            prop_assert!(results.len() <= n_results);
            prop_assert!(results.len() <= embeddings.len());

            for window in results.windows(2) {
                prop_assert!(
                    window[0].distance <= window[1].distance,
                    "results not in ascending order: {} > {}",
                    window[0].distance,
                    window[1].distance,
                );
            }
        }
    }
}

#[tokio::test]
async fn querying_an_empty_store_returns_no_results() {
    let store = InMemoryVectorStore::new();
    let results = store.query(&[1.0, 0.0], 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn count_reflects_added_records() {
    let store = InMemoryVectorStore::new();
    assert_eq!(store.count().await.unwrap(), 0);

    let ids = vec!["chunk_0".to_string(), "chunk_1".to_string()];
    let texts = vec!["alpha".to_string(), "beta".to_string()];
    let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
    store.add(&ids, &texts, &embeddings).await.unwrap();

    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn add_rejects_mismatched_parallel_arrays() {
    let store = InMemoryVectorStore::new();
    let err = store
        .add(&["chunk_0".to_string()], &[], &[vec![1.0]])
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::Validation(_)));
}

#[tokio::test]
async fn reset_is_idempotent_and_leaves_a_queryable_store() {
    let store = InMemoryVectorStore::new();
    let ids = vec!["chunk_0".to_string()];
    let texts = vec!["alpha".to_string()];
    let embeddings = vec![vec![1.0, 0.0]];
    store.add(&ids, &texts, &embeddings).await.unwrap();

    store.reset().await.unwrap();
    store.reset().await.unwrap();

    assert_eq!(store.count().await.unwrap(), 0);
    assert!(store.query(&[1.0, 0.0], 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn nearest_record_comes_back_first() {
    let store = InMemoryVectorStore::new();
    let ids: Vec<String> = (0..3).map(|i| format!("chunk_{i}")).collect();
    let texts = vec!["near".to_string(), "mid".to_string(), "far".to_string()];
    let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-5.0, 0.0]];
    store.add(&ids, &texts, &embeddings).await.unwrap();

    let results = store.query(&[1.0, 0.0], 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text, "near");
    assert_eq!(results[0].distance, 0.0);
    assert_eq!(results[1].text, "mid");
}
