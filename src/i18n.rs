//! 文案目录
//!
//! 组件只通过 key 取文本；内置英文默认值，可由配置里的扁平 JSON 覆盖。
//! 找不到的 key 原样返回。

use std::collections::BTreeMap;

const DEFAULTS: &[(&str, &str)] = &[
    // TCP handshake
    (
        "examples.tcpHandshake.synDescription",
        "Your computer sends a SYN packet with its starting sequence number.",
    ),
    (
        "examples.tcpHandshake.synAckDescription",
        "The server answers with SYN-ACK: its own sequence number and an acknowledgement of yours.",
    ),
    (
        "examples.tcpHandshake.ackDescription",
        "Your computer acknowledges the server's sequence number. The connection is open.",
    ),
    ("examples.tcpHandshake.sendFirstPacket", "Send SYN"),
    ("examples.tcpHandshake.confirmClientPacket", "Reply with SYN-ACK"),
    ("examples.tcpHandshake.confirmServerPacket", "Send ACK"),
    ("examples.tcpHandshake.disconnect", "Disconnect"),
    ("examples.tcpHandshake.disconnected", "Disconnected"),
    ("examples.tcpHandshake.connecting", "Connecting"),
    ("examples.tcpHandshake.retrying", "Retrying"),
    ("examples.tcpHandshake.connected", "Connected"),
    // TCP communication
    ("examples.tcpCommunication.connected", "Connected"),
    ("examples.tcpCommunication.packetDropped", "Packet dropped"),
    ("examples.tcpCommunication.start", "Start sending packets"),
    ("examples.tcpCommunication.restart", "Restart sending packets"),
    ("examples.tcpCommunication.disrupt", "Disrupt network"),
    // HTTP request / response
    ("examples.http.statusIdle", "Ready to send"),
    ("examples.http.statusSending", "Request in flight"),
    ("examples.http.statusProcessing", "Server processing"),
    ("examples.http.statusResponding", "Response in flight"),
    ("examples.http.statusDone", "Response delivered"),
    ("examples.http.hintSending", "Request packet is traveling to the server."),
    ("examples.http.hintProcessing", "Server is building the response."),
    ("examples.http.hintResponding", "Response packet is heading back."),
    (
        "examples.http.hintIdle",
        "Watch the packets move between the browser and the server.",
    ),
    ("examples.http.requestSent", "Request sent"),
    ("examples.http.requestDelivered", "Request delivered"),
    ("examples.http.requestComplete", "Request complete"),
    ("examples.http.receivingResponse", "Receiving response..."),
    ("examples.http.responseReceived", "Response received"),
    ("examples.http.waitingForResponse", "Waiting for response..."),
    ("examples.http.waitingForRequest", "Waiting for request..."),
    ("examples.http.receivingRequest", "Receiving request..."),
    ("examples.http.requestReceived", "Request received"),
    ("examples.http.buildingResponse", "Building response..."),
    ("examples.http.sendingResponse", "Sending response..."),
    ("examples.http.responseSent", "Response sent"),
    ("examples.http.waitingToRespond", "Waiting to respond..."),
    // HTML parsing
    ("examples.parsingHtml.exampleTitle", "Example Domain"),
    (
        "examples.parsingHtml.exampleDescription",
        "This domain is for use in illustrative examples in documents.",
    ),
    ("examples.parsingHtml.exampleLink", "More information..."),
    ("examples.parsingHtml.parse", "Parse HTML"),
    ("examples.parsingHtml.parsing", "Parsing..."),
    // Layout / paint / composite
    ("examples.layoutPaintComposite.layoutTitle", "Layout"),
    (
        "examples.layoutPaintComposite.layoutDescription",
        "Compute the size and position of every box.",
    ),
    ("examples.layoutPaintComposite.paintTitle", "Paint"),
    (
        "examples.layoutPaintComposite.paintDescription",
        "Fill in pixels: text, colors, borders and images.",
    ),
    ("examples.layoutPaintComposite.compositeTitle", "Composite"),
    (
        "examples.layoutPaintComposite.compositeDescription",
        "Combine painted layers into the final frame.",
    ),
    (
        "examples.layoutPaintComposite.clickToSee",
        "Click a button to see which stages rerun.",
    ),
    (
        "examples.layoutPaintComposite.rerunsPaint",
        "Changing the color only reruns paint.",
    ),
    (
        "examples.layoutPaintComposite.rerunsLayoutPaint",
        "Changing the width reruns layout and paint.",
    ),
    // DNS
    ("examples.resolve.resolving", ";; resolving..."),
    ("examples.resolve.invalidHost", "Invalid host name."),
    ("examples.resolve.noRecords", "No records found."),
    // Address bar
    ("examples.anythingToUrl.searchQuery", "search query"),
    ("examples.anythingToUrl.directUrl", "URL"),
    ("examples.anythingToUrl.noTransform", "no transform"),
    ("examples.anythingToUrl.transforms", "The browser turns this into"),
    ("examples.anythingToUrl.sendsAsIs", "The browser sends this as is:"),
];

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<String, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        let entries = DEFAULTS
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { entries }
    }
}

impl Catalog {
    /// 以内置文案为底，叠加 `overrides`
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut c = Self::default();
        for (k, v) in overrides {
            c.entries.insert(k.clone(), v.clone());
        }
        c
    }

    pub fn get(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// 命名空间视图，例如 `catalog.scope("examples.tcpHandshake")`
    pub fn scope<'a>(&'a self, prefix: &'a str) -> Scoped<'a> {
        Scoped {
            catalog: self,
            prefix,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Scoped<'a> {
    catalog: &'a Catalog,
    prefix: &'a str,
}

impl Scoped<'_> {
    pub fn t(&self, key: &str) -> String {
        self.catalog.get(&format!("{}.{}", self.prefix, key))
    }
}
