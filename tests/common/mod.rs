//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use cohort::config::{Settings, StoreKind};
use cohort::domain::entities::group::Group;
use cohort::domain::ports::embedding_store::{EmbeddingStore, StoreError};
use cohort::domain::values::embedding::Embedding;
use cohort::domain::values::group_size::GroupSize;
use cohort::domain::values::user_id::UserId;
use cohort::infrastructure::stores::memory::InMemoryEmbeddingStore;
use cohort::Cohort;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn embeddings(entries: &[(&str, &[f32])]) -> HashMap<UserId, Embedding> {
    entries
        .iter()
        .map(|(id, v)| (UserId::from(*id), Embedding::new(v.to_vec())))
        .collect()
}

/// `n` users named `u000`, `u001`, ... with random unit-ish vectors.
pub fn random_embeddings(n: usize, dim: usize, seed: u64) -> HashMap<UserId, Embedding> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let v: Vec<f32> = (0..dim).map(|_| rng.gen_range(-1.0_f32..1.0)).collect();
            (UserId::new(format!("u{i:03}")), Embedding::new(v))
        })
        .collect()
}

/// Users drawn around `clusters` well separated centroids.
pub fn clustered_embeddings(clusters: usize, per_cluster: usize, seed: u64) -> HashMap<UserId, Embedding> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dim = clusters.max(2) * 2;
    let mut out = HashMap::new();
    for c in 0..clusters {
        for m in 0..per_cluster {
            let v: Vec<f32> = (0..dim)
                .map(|d| {
                    let base = if d == c * 2 { 1.0 } else { 0.0 };
                    base + rng.gen_range(-0.05_f32..0.05)
                })
                .collect();
            out.insert(UserId::new(format!("c{c}m{m}")), Embedding::new(v));
        }
    }
    out
}

pub fn ids(names: &[&str]) -> Vec<UserId> {
    names.iter().map(|n| UserId::from(*n)).collect()
}

pub fn settings() -> Settings {
    Settings {
        store: StoreKind::Memory,
        workers: 2,
        ..Settings::default()
    }
}

pub fn setup(map: HashMap<UserId, Embedding>) -> (Cohort, Arc<InMemoryEmbeddingStore>) {
    let store = Arc::new(InMemoryEmbeddingStore::new(map));
    let cohort = Cohort::with_store(store.clone(), &settings()).unwrap();
    (cohort, store)
}

/// Every user of `expected` appears in exactly one group.
pub fn assert_complete(groups: &[Group], expected: &HashMap<UserId, Embedding>) {
    let mut seen: Vec<UserId> = groups.iter().flat_map(|g| g.members().to_vec()).collect();
    let total = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), total, "a user appears in more than one group");
    let mut want: Vec<UserId> = expected.keys().cloned().collect();
    want.sort();
    assert_eq!(seen, want, "groups do not cover the input exactly");
}

pub fn assert_complete_indices(groups: &[Vec<usize>], n: usize) {
    let mut all: Vec<usize> = groups.iter().flatten().copied().collect();
    all.sort_unstable();
    assert_eq!(all, (0..n).collect::<Vec<_>>(), "partition is not complete: {groups:?}");
}

/// Size rules shared by greedy and maximal cohesion: everything is `k`
/// except either one remainder in `[max(2, ⌈k/2⌉), k)` or a few groups
/// grown past `k` by spread leftovers.
pub fn assert_anchor_sizes(groups: &[Vec<usize>], n: usize, size: GroupSize) {
    let k = size.value();
    if n <= k {
        assert!(groups.len() <= 1);
        return;
    }
    let min_rem = size.min_remainder();
    let max_size = k + min_rem - 1;
    let undersized: Vec<usize> = groups.iter().map(|g| g.len()).filter(|&l| l < k).collect();
    let oversized = groups.iter().filter(|g| g.len() > k).count();
    assert!(undersized.len() <= 1, "more than one remainder group: {groups:?}");
    if let Some(&rem) = undersized.first() {
        assert!(rem >= min_rem && rem < k, "remainder size {rem} out of range for k={k}");
        assert_eq!(oversized, 0, "remainder group and spread leftovers together: {groups:?}");
    }
    for g in groups {
        assert!(g.len() <= max_size, "group of {} exceeds {max_size}", g.len());
    }
}

/// Store that sleeps before answering, so concurrent callers overlap.
pub struct SlowStore {
    pub inner: HashMap<UserId, Embedding>,
    pub delay: Duration,
    pub fetches: AtomicUsize,
    pub failing: AtomicBool,
}

impl SlowStore {
    pub fn new(inner: HashMap<UserId, Embedding>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            fetches: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingStore for SlowStore {
    fn name(&self) -> &str {
        "slow"
    }

    async fn load_all(&self) -> Result<HashMap<UserId, Embedding>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("upstream down".to_string()));
        }
        Ok(self.inner.clone())
    }
}
