//! Access routes: the ordered ways of reaching a resource
//!
//! A route is a pure URL rewrite. Routes are plain data so the list can be
//! configured, reordered and tested without touching the network.

use serde::{Deserialize, Serialize};

/// How a route rewrites the target URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteKind {
    /// Request the target URL as-is
    Direct,
    /// Request `prefix` followed by the target, percent-encoded when `encode` is set
    Prefix { prefix: String, encode: bool },
}

/// One named way of reaching a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRoute {
    /// Short name used in logs and error reports
    pub name: String,
    #[serde(flatten)]
    pub kind: RouteKind,
}

impl AccessRoute {
    pub fn direct() -> Self {
        Self {
            name: "direct".to_string(),
            kind: RouteKind::Direct,
        }
    }

    pub fn prefix(name: impl Into<String>, prefix: impl Into<String>, encode: bool) -> Self {
        Self {
            name: name.into(),
            kind: RouteKind::Prefix {
                prefix: prefix.into(),
                encode,
            },
        }
    }

    /// Builds the URL actually requested for `target`
    pub fn rewrite(&self, target: &str) -> String {
        match &self.kind {
            RouteKind::Direct => target.to_string(),
            RouteKind::Prefix {
                prefix,
                encode: true,
            } => format!("{}{}", prefix, urlencoding::encode(target)),
            RouteKind::Prefix {
                prefix,
                encode: false,
            } => format!("{}{}", prefix, target),
        }
    }
}

/// Default route order, most reliable first
pub fn default_routes() -> Vec<AccessRoute> {
    vec![
        AccessRoute::direct(),
        AccessRoute::prefix("allorigins", "https://api.allorigins.win/raw?url=", true),
        AccessRoute::prefix("codetabs", "https://api.codetabs.com/v1/proxy?quest=", false),
    ]
}
