use std::collections::HashMap;

use async_trait::async_trait;

use super::{ResolveError, Resolver};

const FIXTURES: &[(&str, &[&str])] = &[
    ("example.com", &["93.184.215.14", "2606:2800:21f:cb07:6820:80da:af6b:8b2c"]),
    ("example.org", &["93.184.215.14"]),
    ("example.net", &["93.184.215.14"]),
    ("wikipedia.org", &["185.15.59.224"]),
    ("github.com", &["140.82.112.3"]),
    ("localhost", &["127.0.0.1", "::1"]),
    ("one.one.one.one", &["1.1.1.1", "1.0.0.1"]),
    ("dns.google", &["8.8.8.8", "8.8.4.4"]),
];

/// 固定表查询，离线使用
#[derive(Debug, Clone)]
pub struct FixtureResolver {
    table: HashMap<String, Vec<String>>,
}

impl Default for FixtureResolver {
    fn default() -> Self {
        let table = FIXTURES
            .iter()
            .map(|(host, addrs)| {
                (
                    (*host).to_string(),
                    addrs.iter().map(|a| (*a).to_string()).collect(),
                )
            })
            .collect();
        Self { table }
    }
}

impl FixtureResolver {
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    pub fn with_record(mut self, host: &str, addresses: &[&str]) -> Self {
        self.table.insert(
            host.to_ascii_lowercase(),
            addresses.iter().map(|a| (*a).to_string()).collect(),
        );
        self
    }

    pub fn lookup(&self, host: &str) -> Vec<String> {
        self.table
            .get(&host.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Resolver for FixtureResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<String>, ResolveError> {
        Ok(self.lookup(host))
    }
}
