//! 主机名的规范化与校验

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("scheme regex"));

static HOST_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[^a-z0-9.-]").expect("host chars regex"));

// 每段 1..63 个字符，不能以 '-' 开头或结尾
static VALID_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)*$",
    )
    .expect("host regex")
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("empty host name")]
    Empty,
    #[error("invalid host name `{0}`")]
    Invalid(String),
}

/// 去掉首尾空白、`http(s)://` 前缀，以及 `/`、`?`、`#` 之后的部分。
pub fn normalize_host(input: &str) -> String {
    let trimmed = input.trim();
    let without_scheme = SCHEME.replace(trimmed, "");
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// 输入框回显：在 `normalize_host` 之后再删掉非法字符。
pub fn sanitize_host(input: &str) -> String {
    HOST_CHARS.replace_all(&normalize_host(input), "").into_owned()
}

pub fn is_valid_host(host: &str) -> bool {
    !host.is_empty() && VALID_HOST.is_match(host)
}

/// 规范化并校验；成功时返回小写主机名。
pub fn parse_host(input: &str) -> Result<String, HostError> {
    let host = normalize_host(input);
    if host.is_empty() {
        return Err(HostError::Empty);
    }
    if !is_valid_host(&host) {
        return Err(HostError::Invalid(host));
    }
    Ok(host.to_ascii_lowercase())
}
