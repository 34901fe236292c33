//! 地址栏：把任意输入变成 URL
//!
//! 带 `http(s)://` 的原样发送；像域名的补上 `https://`；其余当作搜索词。

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::i18n::Catalog;

pub const SEARCH_ENDPOINT: &str = "https://google.com/search";

/// 查询参数里保留不转义的字符：字母数字加 `-_.!~*'()`
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Search,
    Url,
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlTransform {
    pub input: String,
    pub url: String,
    pub kind: TransformKind,
}

impl UrlTransform {
    /// “输入 → 结果”的说明文字
    pub fn describe(&self, catalog: &Catalog) -> String {
        let t = catalog.scope("examples.anythingToUrl");
        let lead = match self.kind {
            TransformKind::Direct => t.t("sendsAsIs"),
            _ => t.t("transforms"),
        };
        let kind = match self.kind {
            TransformKind::Search => t.t("searchQuery"),
            TransformKind::Url => t.t("directUrl"),
            TransformKind::Direct => t.t("noTransform"),
        };
        format!("{lead} {}\n\"{}\" → {kind}", self.url, self.input)
    }
}

fn has_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// 空白输入返回 `None`
pub fn to_url(input: &str) -> Option<UrlTransform> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (url, kind) = if has_scheme(trimmed) {
        (trimmed.to_string(), TransformKind::Direct)
    } else if trimmed.contains('.') && !trimmed.chars().any(char::is_whitespace) {
        (format!("https://{trimmed}"), TransformKind::Url)
    } else {
        let q = utf8_percent_encode(trimmed, QUERY_COMPONENT);
        (format!("{SEARCH_ENDPOINT}?q={q}"), TransformKind::Search)
    };
    Some(UrlTransform {
        input: trimmed.to_string(),
        url,
        kind,
    })
}
