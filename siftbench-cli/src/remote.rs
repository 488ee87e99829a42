//! HTTP Search Client
//!
//! One realization of the opaque search operation: an HTTP/JSON endpoint
//! exposing vector-indexed top-k search at `POST {origin}/v1/search`. Any
//! backend speaking this shape is substitutable behind the
//! [`SearchClient`] trait.
//!
//! Connection establishment is verified once, with a bounded dial timeout,
//! before any worker starts; after dispatch begins, requests carry no
//! per-request deadline (the run blocks on the service, which is the
//! workload being measured).

use anyhow::Context;
use serde::Serialize;
use serde_json::json;
use siftbench_core::{ClientError, SearchClient, SearchRequest, SearchResults};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Blocking HTTP client for the remote search service.
pub struct RemoteClient {
    http: reqwest::blocking::Client,
    search_url: reqwest::Url,
}

#[derive(Serialize)]
struct SearchBody<'a> {
    collection_name: &'a str,
    partition_names: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    expr: Option<&'a str>,
    output_fields: &'a [String],
    anns_field: &'a str,
    metric_type: String,
    limit: usize,
    params: serde_json::Value,
    vectors: &'a [Vec<f32>],
}

impl RemoteClient {
    /// Connect to the service, verifying reachability within
    /// `dial_timeout` before returning. This is the only timeout in the
    /// system.
    pub fn connect(origin: &str, dial_timeout: Duration) -> anyhow::Result<Self> {
        let base: reqwest::Url = origin
            .parse()
            .with_context(|| format!("invalid origin {origin:?}"))?;

        preflight(&base, dial_timeout)
            .with_context(|| format!("failed to reach {origin} within {dial_timeout:?}"))?;

        let http = reqwest::blocking::Client::builder()
            .connect_timeout(dial_timeout)
            .build()
            .context("building http client")?;
        let search_url = base.join("/v1/search").context("building search url")?;

        tracing::debug!(%search_url, "connected to search service");
        Ok(Self { http, search_url })
    }
}

/// Resolve the origin and open one TCP connection within the timeout.
fn preflight(base: &reqwest::Url, dial_timeout: Duration) -> anyhow::Result<()> {
    let host = base
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("origin has no host"))?;
    let port = base
        .port_or_known_default()
        .ok_or_else(|| anyhow::anyhow!("origin has no port"))?;

    let addrs: Vec<_> = (host, port)
        .to_socket_addrs()
        .with_context(|| format!("resolving {host}:{port}"))?
        .collect();

    let mut last_err = anyhow::anyhow!("{host}:{port} resolved to no addresses");
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, dial_timeout) {
            Ok(_) => return Ok(()),
            Err(err) => last_err = err.into(),
        }
    }
    Err(last_err)
}

impl SearchClient for RemoteClient {
    fn search(
        &self,
        request: &SearchRequest,
        vectors: &[Vec<f32>],
    ) -> Result<SearchResults, ClientError> {
        let (knob, value) = request.params.knob();
        let mut params = serde_json::Map::new();
        params.insert("index_type".to_string(), json!(request.params.index_type()));
        params.insert(knob.to_string(), json!(value));

        let body = SearchBody {
            collection_name: &request.collection,
            partition_names: &request.partitions,
            expr: request.expr.as_deref(),
            output_fields: &request.output_fields,
            anns_field: &request.field,
            metric_type: request.metric.to_string(),
            limit: request.limit,
            params: serde_json::Value::Object(params),
            vectors,
        };

        let response = self
            .http
            .post(self.search_url.clone())
            .json(&body)
            .send()
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let results: SearchResults = response
            .json()
            .map_err(|err| ClientError::Response(err.to_string()))?;

        if results.hits.len() > vectors.len() {
            return Err(ClientError::Response(format!(
                "{} hit lists for {} query vectors",
                results.hits.len(),
                vectors.len()
            )));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_origin_fails_preflight() {
        // Reserved TEST-NET-1 address, nothing listens there.
        let err = RemoteClient::connect("http://192.0.2.1:19530", Duration::from_millis(50));
        assert!(err.is_err());
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let err = RemoteClient::connect("not a url", Duration::from_millis(50));
        assert!(err.is_err());
    }

    #[test]
    fn test_search_body_shape() {
        let body = SearchBody {
            collection_name: "glove25",
            partition_names: &[],
            expr: None,
            output_fields: &[],
            anns_field: "embedding",
            metric_type: "L2".to_string(),
            limit: 10,
            params: json!({"index_type": "HNSW", "ef": 64}),
            vectors: &[vec![0.1, 0.2]],
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["collection_name"], "glove25");
        assert_eq!(value["anns_field"], "embedding");
        assert_eq!(value["params"]["ef"], 64);
        assert!(value.get("expr").is_none());
    }
}
