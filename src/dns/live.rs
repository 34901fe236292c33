//! 真实查询的显示状态
//!
//! 每次提交都会中止上一次还没完成的查询，并提升 generation；
//! 查询完成时 generation 已经变化则什么也不做。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{HostError, Resolver, parse_host, sanitize_host};
use crate::i18n::Catalog;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupDisplay {
    pub host: String,
    pub loading: bool,
    pub addresses: Vec<String>,
    pub error: Option<String>,
}

pub struct LiveLookup<R: Resolver + 'static> {
    resolver: Arc<R>,
    generation: Arc<AtomicU64>,
    display: Arc<Mutex<LookupDisplay>>,
    inflight: Option<JoinHandle<()>>,
    invalid_host: String,
    no_records: String,
}

impl<R: Resolver + 'static> LiveLookup<R> {
    pub fn new(resolver: R, catalog: &Catalog) -> Self {
        let t = catalog.scope("examples.resolve");
        Self {
            resolver: Arc::new(resolver),
            generation: Arc::new(AtomicU64::new(0)),
            display: Arc::new(Mutex::new(LookupDisplay::default())),
            inflight: None,
            invalid_host: t.t("invalidHost"),
            no_records: t.t("noRecords"),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// 输入变化：清空结果与错误，之前的查询仍可能完成。
    pub async fn edit(&self, input: &str) {
        let mut d = self.display.lock().await;
        d.host = sanitize_host(input);
        d.addresses.clear();
        d.error = None;
    }

    /// 校验并发起一次查询，返回本次查询的 generation。
    pub async fn submit(&mut self, input: &str) -> Result<u64, HostError> {
        let host = match parse_host(input) {
            Ok(h) => h,
            Err(e) => {
                // 非法输入同样取代还在进行的查询
                self.retire();
                let mut d = self.display.lock().await;
                d.loading = false;
                d.addresses.clear();
                d.error = Some(self.invalid_host.clone());
                warn!(input, "rejected host");
                return Err(e);
            }
        };

        let generation = self.retire();
        {
            let mut d = self.display.lock().await;
            d.host = host.clone();
            d.loading = true;
            d.error = None;
        }
        info!(host = %host, generation, "lookup submitted");

        let resolver = Arc::clone(&self.resolver);
        let current = Arc::clone(&self.generation);
        let display = Arc::clone(&self.display);
        let no_records = self.no_records.clone();
        self.inflight = Some(tokio::spawn(async move {
            let result = resolver.resolve(&host).await;
            let mut d = display.lock().await;
            if current.load(Ordering::SeqCst) != generation {
                debug!(host = %host, generation, "superseded lookup ignored");
                return;
            }
            d.loading = false;
            match result {
                Ok(addresses) if addresses.is_empty() => {
                    d.addresses.clear();
                    d.error = Some(no_records);
                }
                Ok(addresses) => {
                    d.addresses = addresses;
                    d.error = None;
                }
                Err(e) => {
                    warn!(host = %host, error = %e, "lookup failed");
                    d.addresses.clear();
                    d.error = Some(e.to_string());
                }
            }
        }));
        Ok(generation)
    }

    /// 中止进行中的查询并提升 generation，返回新的 generation。
    fn retire(&mut self) -> u64 {
        if let Some(prev) = self.inflight.take() {
            prev.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// 等待当前查询结束（被中止也算结束）。
    pub async fn wait(&mut self) {
        if let Some(handle) = self.inflight.take() {
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => warn!(error = %e, "lookup task failed"),
            }
        }
    }

    pub async fn snapshot(&self) -> LookupDisplay {
        self.display.lock().await.clone()
    }
}

impl<R: Resolver + 'static> Drop for LiveLookup<R> {
    fn drop(&mut self) {
        // 卸载后旧任务不能再写显示状态
        self.retire();
    }
}
