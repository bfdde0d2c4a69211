//! Landing page plugin: an interactive query explorer served at `/`.
//!
//! The page points the explorer at the address the HTTP app actually bound,
//! so it reads the app handle at render time rather than at construction.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::http::HttpApp;
use crate::server::plugin::{ServerInfo, ServerPlugin};

const SANDBOX_SCRIPT: &str =
    "https://embeddable-sandbox.cdn.apollographql.com/_latest/embeddable-sandbox.umd.production.min.js";

pub struct LandingPagePlugin {
    app: Arc<HttpApp>,
}

impl LandingPagePlugin {
    pub fn new(app: Arc<HttpApp>) -> Self {
        Self { app }
    }
}

#[async_trait]
impl ServerPlugin for LandingPagePlugin {
    fn name(&self) -> &'static str {
        "landing-page"
    }

    fn landing_page(&self, info: &ServerInfo) -> Option<String> {
        let endpoint = match self.app.local_addr() {
            Some(addr) => endpoint_url(addr, &info.graphql_path),
            None => info.graphql_path.clone(),
        };
        Some(render(&endpoint))
    }
}

/// Browser-facing URL of the GraphQL endpoint.
pub fn endpoint_url(addr: SocketAddr, graphql_path: &str) -> String {
    let host = if addr.ip().is_unspecified() {
        "localhost".to_string()
    } else if addr.is_ipv6() {
        format!("[{}]", addr.ip())
    } else {
        addr.ip().to_string()
    };
    format!("http://{}:{}{}", host, addr.port(), graphql_path)
}

fn render(endpoint: &str) -> String {
    // JSON string literal, with `</` broken up so it cannot close the script tag.
    let endpoint_js = serde_json::Value::String(endpoint.to_string())
        .to_string()
        .replace("</", "<\\/");
    let endpoint_html = escape_html(endpoint);

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>supergraph-gateway</title>
    <style>
      html, body {{ margin: 0; height: 100%; }}
      #embedded-sandbox {{ height: 100vh; width: 100%; }}
    </style>
  </head>
  <body>
    <div id="embedded-sandbox"></div>
    <noscript>GraphQL endpoint: <code>{endpoint_html}</code></noscript>
    <script src="{SANDBOX_SCRIPT}"></script>
    <script>
      new window.EmbeddedSandbox({{
        target: "#embedded-sandbox",
        initialEndpoint: {endpoint_js},
      }});
    </script>
  </body>
</html>
"##
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
