//! # Response Cache
//!
//! Read-through cache for GET responses with explicit invalidation, backed by
//! `moka` with a TTL and a capacity bound.
//!
//! ## Invalidation Map
//! ```text
//! ┌────────────────────────────┬────────────────────────────────────────────┐
//! │ Action                     │ Invalidates                                │
//! ├────────────────────────────┼────────────────────────────────────────────┤
//! │ create/accept/cancel       │ Car(id), car searches, MyReservations,     │
//! │ reservation                │ ReceivedReservations, AllReservations      │
//! │ create/update/delete       │ Car(id), TopRated, car searches            │
//! │ rating                     │                                            │
//! │ create/update/delete car   │ Car(id), car searches, MyCars, TopRated    │
//! │ membership upgrade/cancel  │ MembershipStatus                           │
//! │ promotion changes          │ Promotions                                 │
//! │ user/profile changes       │ AllUsers, MembershipStatus                 │
//! └────────────────────────────┴────────────────────────────────────────────┘
//! ```
//!
//! ## Late Responses
//! ```text
//! read:   miss ── generation g ── GET ......... response ── put_fresh(g)
//! write:                  invalidate ── generation g+1          │
//!                                                               ▼
//!                                          g != g+1, entry dropped again
//! ```
//! A read that was in flight when a write invalidated the cache never
//! leaves its stale response behind.

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Identifies one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Car(String),
    /// A car search, keyed by its rendered query string.
    CarSearch(String),
    MyCars,
    MyTopRatedCars,
    MyReservations,
    ReceivedReservations,
    AllReservations,
    MembershipStatus,
    MembershipTiers,
    Promotions,
    AllUsers,
}

impl CacheKey {
    /// The three reservation lists.
    pub const RESERVATION_LISTS: [CacheKey; 3] = [
        CacheKey::MyReservations,
        CacheKey::ReceivedReservations,
        CacheKey::AllReservations,
    ];

    fn is_search(&self) -> bool {
        matches!(self, CacheKey::CarSearch(_))
    }
}

/// Searches live apart so they can be dropped in one call.
struct Stores {
    reads: Cache<CacheKey, Value>,
    searches: Cache<CacheKey, Value>,
}

impl Stores {
    fn for_key(&self, key: &CacheKey) -> &Cache<CacheKey, Value> {
        if key.is_search() {
            &self.searches
        } else {
            &self.reads
        }
    }
}

/// TTL cache of JSON values.
pub struct ResponseCache {
    stores: Option<Stores>,
    /// Bumped by every invalidation.
    generation: AtomicU64,
}

impl ResponseCache {
    /// `None` disables caching entirely. `max_entries` bounds each store.
    pub fn new(ttl: Option<Duration>, max_entries: u64) -> Self {
        let stores = ttl.map(|ttl| Stores {
            reads: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
            searches: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        });

        ResponseCache {
            stores,
            generation: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.stores.is_some()
    }

    /// Current invalidation generation. Read it before fetching and hand it
    /// to [`ResponseCache::put_fresh`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns a fresh entry, or `None` when missing, expired, or of another
    /// shape.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let value = self.stores.as_ref()?.for_key(key).get(key).await?;
        debug!(?key, "Cache hit");
        serde_json::from_value(value).ok()
    }

    /// Stores unconditionally.
    pub async fn put<T: Serialize>(&self, key: CacheKey, value: &T) {
        let Some(stores) = &self.stores else {
            return;
        };
        if let Ok(value) = serde_json::to_value(value) {
            stores.for_key(&key).insert(key, value).await;
        }
    }

    /// Stores a response fetched since `generation`, unless an invalidation
    /// happened in between. Returns whether the entry was kept.
    pub async fn put_fresh<T: Serialize>(&self, key: CacheKey, value: &T, generation: u64) -> bool {
        let Some(stores) = &self.stores else {
            return false;
        };
        if self.generation() != generation {
            debug!(?key, "Discarding response that predates an invalidation");
            return false;
        }
        let Ok(value) = serde_json::to_value(value) else {
            return false;
        };

        let store = stores.for_key(&key);
        store.insert(key.clone(), value).await;

        // An invalidation may have landed between the check and the insert.
        if self.generation() != generation {
            store.invalidate(&key).await;
            debug!(?key, "Discarding response that predates an invalidation");
            return false;
        }
        true
    }

    pub async fn invalidate(&self, keys: &[CacheKey]) {
        self.bump();
        let Some(stores) = &self.stores else {
            return;
        };
        for key in keys {
            stores.for_key(key).invalidate(key).await;
            debug!(?key, "Cache entry invalidated");
        }
    }

    /// Drops every cached car search.
    pub async fn invalidate_searches(&self) {
        self.bump();
        if let Some(stores) = &self.stores {
            stores.searches.invalidate_all();
            debug!("Car searches invalidated");
        }
    }

    pub async fn clear(&self) {
        self.bump();
        if let Some(stores) = &self.stores {
            stores.reads.invalidate_all();
            stores.searches.invalidate_all();
        }
    }

    /// Live entries after pending evictions have run.
    pub async fn len(&self) -> u64 {
        let Some(stores) = &self.stores else {
            return 0;
        };
        stores.reads.run_pending_tasks().await;
        stores.searches.run_pending_tasks().await;
        stores.reads.entry_count() + stores.searches.entry_count()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.stores
            .as_ref()
            .map(|stores| stores.for_key(key).contains_key(key))
            .unwrap_or(false)
    }
}
