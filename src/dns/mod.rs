//! DNS 查询
//!
//! 模拟组件用本地固定表；`DohResolver` 通过 DNS-over-HTTPS 真实查询。
//! 查询方只看到“地址列表或无记录”，被新查询取代的旧查询不会更新显示。

mod doh;
mod fixtures;
mod host;
mod live;

pub use doh::{DohResolver, RecordType};
pub use fixtures::FixtureResolver;
pub use host::{HostError, is_valid_host, normalize_host, parse_host, sanitize_host};
pub use live::{LiveLookup, LookupDisplay};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("DoH request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("DoH server returned status {0}")]
    ServerStatus(u32),
    #[error("invalid DoH endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// 主机名 → 地址列表。空列表表示没有记录。
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, host: &str) -> Result<Vec<String>, ResolveError>;
}
