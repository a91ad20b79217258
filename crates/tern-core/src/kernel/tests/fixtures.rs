use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::{CacheEntry, CachePool, MemoryCachePool, SharedCachePool};
use crate::config::KernelConfig;
use crate::event::{Event, EventListener, EventResult};
use crate::http::BufferedOutput;
use crate::kernel::context::ContextBuilder;
use crate::kernel::env::{EnvSource, StaticEnvSource};
use crate::kernel::error::Result;
use crate::kernel::BootstrapContext;

/// Memory pool that counts writes
#[derive(Debug, Default)]
pub struct CountingPool {
    inner: MemoryCachePool,
    saves: AtomicU32,
}

impl CountingPool {
    pub fn saves(&self) -> u32 {
        self.saves.load(Ordering::SeqCst)
    }
}

impl CachePool for CountingPool {
    fn name(&self) -> &str {
        "counting"
    }

    fn has_item(&self, key: &str) -> Result<bool> {
        self.inner.has_item(key)
    }

    fn get_item(&self, key: &str) -> Result<Option<CacheEntry>> {
        self.inner.get_item(key)
    }

    fn save(&self, entry: CacheEntry) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(entry)
    }

    fn delete_item(&self, key: &str) -> Result<bool> {
        self.inner.delete_item(key)
    }

    fn clear(&self) -> Result<usize> {
        self.inner.clear()
    }
}

#[derive(Debug, Default)]
pub struct CountingEnvSource {
    loads: AtomicU32,
}

impl CountingEnvSource {
    pub fn loads(&self) -> u32 {
        self.loads.load(Ordering::SeqCst)
    }
}

impl EnvSource for CountingEnvSource {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        StaticEnvSource::new([("APP_ENV", "test")]).load()
    }
}

/// Counts every event it is subscribed to
pub struct CountingListener {
    pub event: &'static str,
    pub seen: Arc<AtomicU32>,
}

#[async_trait]
impl EventListener for CountingListener {
    fn listens_to(&self) -> &'static str {
        self.event
    }

    async fn on_event(&self, _event: &dyn Event) -> EventResult {
        self.seen.fetch_add(1, Ordering::SeqCst);
        EventResult::Continue
    }
}

/// Context wired to in-memory collaborators
pub struct Harness {
    pub pool: Arc<CountingPool>,
    pub output: Arc<BufferedOutput>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            pool: Arc::new(CountingPool::default()),
            output: Arc::new(BufferedOutput::new()),
        }
    }

    /// The counting pool as the kernel sees it
    pub fn shared_pool(&self) -> SharedCachePool {
        self.pool.clone()
    }

    pub fn builder(&self) -> ContextBuilder {
        BootstrapContext::builder(KernelConfig::default())
            .cache_pool(self.pool.clone())
            .output(self.output.clone())
            .env_source(Arc::new(StaticEnvSource::default()))
    }
}
