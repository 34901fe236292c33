//! 配置
//!
//! 每个组件的时序常量都是显式的不可变值，在构造组件时传入。
//! 配置文件为 JSON，所有字段都有默认值。

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::SimTime;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported schema_version {found} (expected {SCHEMA_VERSION})")]
    SchemaVersion { found: u32 },
}

fn ms(v: u64) -> SimTime {
    SimTime::from_millis(v)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeTiming {
    pub start_delay_ms: u64,
    pub travel_ms: u64,
}

impl Default for HandshakeTiming {
    fn default() -> Self {
        Self {
            start_delay_ms: 180,
            travel_ms: 1400,
        }
    }
}

impl HandshakeTiming {
    pub fn start_delay(&self) -> SimTime {
        ms(self.start_delay_ms)
    }

    /// 最后一步从发出到“已连接”的时长
    pub fn arrival(&self) -> SimTime {
        ms(self.start_delay_ms.saturating_add(self.travel_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferTiming {
    pub start_delay_ms: u64,
    pub travel_ms: u64,
    /// 到达后、交付前的停留
    pub settle_ms: u64,
    /// 交付后到反方向发送的间隔
    pub turnaround_ms: u64,
    pub alert_ms: u64,
    pub recovery_ms: u64,
    pub resend_ms: u64,
}

impl Default for TransferTiming {
    fn default() -> Self {
        Self {
            start_delay_ms: 140,
            travel_ms: 1200,
            settle_ms: 120,
            turnaround_ms: 420,
            alert_ms: 600,
            recovery_ms: 560,
            resend_ms: 200,
        }
    }
}

impl TransferTiming {
    pub fn start_delay(&self) -> SimTime {
        ms(self.start_delay_ms)
    }
    pub fn delivery(&self) -> SimTime {
        ms(self
            .start_delay_ms
            .saturating_add(self.travel_ms)
            .saturating_add(self.settle_ms))
    }
    pub fn turnaround(&self) -> SimTime {
        ms(self.turnaround_ms)
    }
    pub fn alert(&self) -> SimTime {
        ms(self.alert_ms)
    }
    pub fn recovery(&self) -> SimTime {
        ms(self.recovery_ms)
    }
    pub fn resend(&self) -> SimTime {
        ms(self.resend_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeTiming {
    pub start_delay_ms: u64,
    pub travel_ms: u64,
    pub server_ms: u64,
}

impl Default for ExchangeTiming {
    fn default() -> Self {
        Self {
            start_delay_ms: 180,
            travel_ms: 2200,
            server_ms: 600,
        }
    }
}

impl ExchangeTiming {
    pub fn start_delay(&self) -> SimTime {
        ms(self.start_delay_ms)
    }
    pub fn travel(&self) -> SimTime {
        ms(self.travel_ms)
    }
    pub fn server(&self) -> SimTime {
        ms(self.server_ms)
    }
    /// start → done 的总时长
    pub fn total(&self) -> SimTime {
        ms(self
            .start_delay_ms
            .saturating_mul(2)
            .saturating_add(self.travel_ms.saturating_mul(2))
            .saturating_add(self.server_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingTiming {
    pub step_ms: u64,
}

impl Default for ParsingTiming {
    fn default() -> Self {
        Self { step_ms: 900 }
    }
}

impl ParsingTiming {
    pub fn step(&self) -> SimTime {
        ms(self.step_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineTiming {
    pub highlight_ms: u64,
}

impl Default for PipelineTiming {
    fn default() -> Self {
        Self { highlight_ms: 1400 }
    }
}

impl PipelineTiming {
    pub fn highlight(&self) -> SimTime {
        ms(self.highlight_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveTiming {
    pub lookup_ms: u64,
}

impl Default for ResolveTiming {
    fn default() -> Self {
        Self { lookup_ms: 500 }
    }
}

impl ResolveTiming {
    pub fn lookup(&self) -> SimTime {
        ms(self.lookup_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub handshake: HandshakeTiming,
    pub transfer: TransferTiming,
    pub exchange: ExchangeTiming,
    pub parsing: ParsingTiming,
    pub pipeline: PipelineTiming,
    pub resolve: ResolveTiming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DohConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for DohConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloudflare-dns.com/dns-query".to_string(),
            timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkthroughConfig {
    pub schema_version: u32,
    pub timing: Timing,
    pub doh: DohConfig,
    /// 覆盖内置文案（key → 文本）
    pub messages: BTreeMap<String, String>,
}

impl Default for WalkthroughConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            timing: Timing::default(),
            doh: DohConfig::default(),
            messages: BTreeMap::new(),
        }
    }
}

impl WalkthroughConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: WalkthroughConfig = serde_json::from_str(raw)?;
        if cfg.schema_version != SCHEMA_VERSION {
            return Err(ConfigError::SchemaVersion {
                found: cfg.schema_version,
            });
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }
}
