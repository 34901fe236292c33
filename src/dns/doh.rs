//! DNS-over-HTTPS（JSON 接口，`application/dns-json`）

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::{ResolveError, Resolver};
use crate::config::DohConfig;

const NOERROR: u32 = 0;
const NXDOMAIN: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A,
    Aaaa,
}

impl RecordType {
    fn code(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Aaaa => 28,
        }
    }

    fn name(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: u32,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: u16,
    data: String,
}

#[derive(Debug, Clone)]
pub struct DohResolver {
    http: Client,
    endpoint: Url,
    record_types: Vec<RecordType>,
}

impl DohResolver {
    pub fn new(cfg: &DohConfig) -> Result<Self, ResolveError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            endpoint: Url::parse(&cfg.endpoint)?,
            record_types: vec![RecordType::A, RecordType::Aaaa],
        })
    }

    pub fn with_record_types(mut self, types: Vec<RecordType>) -> Self {
        self.record_types = types;
        self
    }

    async fn query(&self, host: &str, rtype: RecordType) -> Result<Vec<String>, ResolveError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("name", host), ("type", rtype.name())])
            .header(reqwest::header::ACCEPT, "application/dns-json")
            .send()
            .await?
            .error_for_status()?;
        let body: DohResponse = response.json().await?;
        debug!(host, rtype = rtype.name(), status = body.status, answers = body.answer.len(), "doh answer");
        match body.status {
            NOERROR => Ok(parse_answers(body.answer, rtype)),
            NXDOMAIN => Ok(Vec::new()),
            other => Err(ResolveError::ServerStatus(other)),
        }
    }
}

/// 只保留请求类型的记录（CNAME 链上的中间记录会被跳过）。
fn parse_answers(answers: Vec<DohAnswer>, rtype: RecordType) -> Vec<String> {
    answers
        .into_iter()
        .filter(|a| a.record_type == rtype.code())
        .map(|a| a.data)
        .collect()
}

#[async_trait]
impl Resolver for DohResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<String>, ResolveError> {
        info!(host, endpoint = %self.endpoint, "doh lookup");
        let mut out = Vec::new();
        for rtype in &self.record_types {
            for addr in self.query(host, *rtype).await? {
                if !out.contains(&addr) {
                    out.push(addr);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_answers_skips_cname_records() {
        let raw = r#"{
            "Status": 0,
            "Answer": [
                { "name": "www.example.com", "type": 5, "TTL": 60, "data": "example.com." },
                { "name": "example.com", "type": 1, "TTL": 60, "data": "93.184.215.14" }
            ]
        }"#;
        let body: DohResponse = serde_json::from_str(raw).expect("parse doh json");
        assert_eq!(body.status, NOERROR);
        assert_eq!(parse_answers(body.answer, RecordType::A), vec!["93.184.215.14"]);
    }

    #[test]
    fn nxdomain_body_without_answer_parses() {
        let body: DohResponse =
            serde_json::from_str(r#"{ "Status": 3 }"#).expect("parse doh json");
        assert_eq!(body.status, NXDOMAIN);
        assert!(body.answer.is_empty());
    }
}
