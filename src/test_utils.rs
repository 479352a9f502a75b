// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::types::ResourceType;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Key = (String, String);

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Each (method, path) holds a queue of responses. Every request pops the
/// front of the queue until a single response remains, which is then
/// repeated. This lets a test describe a resource converging over poll ticks.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<Key, VecDeque<(u16, String)>>>>,
    requests: Arc<Mutex<Vec<(String, String, Vec<u8>)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the path. Repeated calls
    /// for the same path queue up responses in order.
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.push("GET", path, status, body)
    }

    /// Queue a series of GET responses for the same path
    pub fn on_get_sequence(self, path: &str, responses: Vec<(u16, String)>) -> Self {
        responses
            .into_iter()
            .fold(self, |mock, (status, body)| mock.push("GET", path, status, &body))
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.push("POST", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.push("PATCH", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.push("PUT", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.push("DELETE", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "https://kubernetes.default.svc")
    }

    /// JSON bodies of the recorded requests for a method and exact path.
    /// Requests without a body are recorded as `Null`.
    pub fn requests(&self, method: &str, path: &str) -> Vec<serde_json::Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p, _)| m == method && p == path)
            .map(|(_, _, body)| serde_json::from_slice(body).unwrap_or(serde_json::Value::Null))
            .collect()
    }

    pub fn request_count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p, _)| m == method && p == path)
            .count()
    }

    fn next_response(queue: &mut VecDeque<(u16, String)>) -> Option<(u16, String)> {
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let mut responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(queue) = responses.get_mut(&(method.to_string(), path.to_string())) {
            return Self::next_response(queue);
        }

        // Try prefix match for paths like /api/v1/namespaces/foo
        for ((m, p), queue) in responses.iter_mut() {
            if m == method && path.starts_with(p.as_str()) {
                return Self::next_response(queue);
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = match req.into_body().collect().await {
                Ok(collected) => collected.to_bytes().to_vec(),
                Err(_) => Vec::new(),
            };
            requests.lock().unwrap().push((method, path, body));

            match response {
                Some((status, body)) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body.into_bytes()))
                    .unwrap()),
                None => {
                    // Default 404 for unmatched requests
                    let body = r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#;
                    Ok(Response::builder()
                        .status(404)
                        .header("content-type", "application/json")
                        .body(Body::from(body.as_bytes().to_vec()))
                        .unwrap())
                }
            }
        })
    }
}

/// A single status condition
pub fn condition_json(condition_type: &str, status: &str, reason: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "type": condition_type,
        "status": status,
        "reason": reason,
        "message": message,
        "lastTransitionTime": "2026-01-01T00:00:00Z"
    })
}

/// Any object of the given type. `extra` is merged into the top level.
pub fn object_json(
    resource_type: &ResourceType,
    namespace: &str,
    name: &str,
    extra: serde_json::Value,
) -> serde_json::Value {
    let mut metadata = serde_json::json!({"name": name, "uid": format!("{}-uid", name)});
    if !namespace.is_empty() {
        metadata["namespace"] = serde_json::json!(namespace);
    }
    let mut obj = serde_json::json!({
        "apiVersion": resource_type.api_version(),
        "kind": resource_type.kind,
        "metadata": metadata,
    });
    if let (Some(target), serde_json::Value::Object(fields)) = (obj.as_object_mut(), extra) {
        for (k, v) in fields {
            if k == "metadata" {
                if let (Some(meta), serde_json::Value::Object(extra_meta)) =
                    (target.get_mut("metadata").and_then(|m| m.as_object_mut()), v)
                {
                    meta.extend(extra_meta);
                }
            } else {
                target.insert(k, v);
            }
        }
    }
    obj
}

/// A HostedCluster with the given platform and condition list
pub fn hosted_cluster_json(
    name: &str,
    namespace: &str,
    platform: &str,
    conditions: serde_json::Value,
) -> String {
    object_json(
        &crate::types::resource::HOSTED_CLUSTER,
        namespace,
        name,
        serde_json::json!({
            "spec": {"platform": {"type": platform}, "release": {"image": "quay.io/ocp-release:4.19.22-multi"}},
            "status": {"conditions": conditions}
        }),
    )
    .to_string()
}

/// A list response for the given type
pub fn list_json(resource_type: &ResourceType, items: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "apiVersion": resource_type.api_version(),
        "kind": format!("{}List", resource_type.kind),
        "metadata": {"resourceVersion": "1"},
        "items": items
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}
