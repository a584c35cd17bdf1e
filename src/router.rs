//! HTTP routing with matchit.
//!
//! Provides a simple router for registering and dispatching HTTP handlers.
//! Every path registered through a [`Router`] is placed under its prefix.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use hyper::Method;
use libsql::Connection;
use serde::de::DeserializeOwned;

use crate::Result;
use crate::db::Provider;
use crate::response::HttpResponse;

/// Boxed future for async handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handler context passed to route handlers.
pub struct Context {
    /// The HTTP method.
    pub method: Method,
    /// The request URI.
    pub uri: hyper::Uri,
    /// Route parameters (e.g., {id} from path).
    pub params: HashMap<String, String>,
    /// The request body, pre-read as bytes.
    pub body: Bytes,
    /// Connection provider shared by all requests.
    pub db: Arc<dyn Provider>,
}

impl Context {
    /// Parse the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            serde_json::from_value(serde_json::Value::Null)
                .map_err(|e| crate::Error::Validation(format!("Invalid request body: {e}")))
        } else {
            serde_json::from_slice(&self.body)
                .map_err(|e| crate::Error::Validation(format!("Invalid request body: {e}")))
        }
    }

    /// Get a route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Get an integer route parameter.
    ///
    /// A segment that is not an integer does not name a resource, so it is
    /// reported like an unknown route.
    pub fn id(&self, name: &str) -> Result<i64> {
        self.param(name)
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| crate::Error::NotFound("Not found".to_string()))
    }

    /// Open a connection for this request.
    pub async fn connect(&self) -> Result<Connection> {
        self.db.connect().await
    }
}

/// Handler function type.
/// Takes a Context and returns a future resolving to a Response.
pub type Handler = Box<dyn Fn(Context) -> BoxFuture<'static, Result<HttpResponse>> + Send + Sync>;

/// A registered route with method-specific handlers.
struct RouteEntry {
    handlers: HashMap<Method, Handler>,
}

/// HTTP router for registering and dispatching requests.
pub struct Router {
    prefix: String,
    routes: matchit::Router<usize>,
    paths: HashMap<String, usize>,
    entries: Vec<RouteEntry>,
}

impl Router {
    /// Create a router without a path prefix.
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    /// Create a router that places every route under `prefix` (e.g. `/api`).
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: matchit::Router::new(),
            paths: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// The prefix shared by every registered path.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a handler for a method and path.
    ///
    /// # Example
    /// ```ignore
    /// router.route(Method::GET, "/students", |ctx| async move {
    ///     response::ok(&["ana", "bia"])
    /// });
    /// ```
    pub fn route<F, Fut>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        let full = format!("{}{}", self.prefix, path);

        let entry_idx = match self.paths.get(&full) {
            Some(idx) => *idx,
            None => {
                let idx = self.entries.len();
                if let Err(e) = self.routes.insert(full.clone(), idx) {
                    tracing::error!("Cannot register route {full}: {e}");
                    return;
                }
                self.entries.push(RouteEntry {
                    handlers: HashMap::new(),
                });
                self.paths.insert(full, idx);
                idx
            }
        };

        let boxed: Handler = Box::new(move |ctx| Box::pin(handler(ctx)));
        self.entries[entry_idx].handlers.insert(method, boxed);
    }

    /// Convenience method for GET requests.
    pub fn get<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::GET, path, handler);
    }

    /// Convenience method for POST requests.
    pub fn post<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::POST, path, handler);
    }

    /// Convenience method for PUT requests.
    pub fn put<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::PUT, path, handler);
    }

    /// Convenience method for DELETE requests.
    pub fn delete<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::DELETE, path, handler);
    }

    /// Convert to a thread-safe handle for use in request handling.
    pub fn into_handle(self) -> Arc<RouterHandle> {
        Arc::new(RouterHandle {
            routes: self.routes,
            entries: self.entries,
        })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe router handle for use in request handling.
pub struct RouterHandle {
    routes: matchit::Router<usize>,
    entries: Vec<RouteEntry>,
}

/// Result of matching a request to a route.
pub enum RouteMatch<'a> {
    /// Route matched with handler.
    Matched {
        handler: &'a Handler,
        params: HashMap<String, String>,
    },
    /// Path matched but method not allowed.
    MethodNotAllowed,
    /// Path not found.
    NotFound,
}

impl RouterHandle {
    /// Match a request to a route.
    pub fn match_route(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        let Ok(matched) = self.routes.at(path) else {
            return RouteMatch::NotFound;
        };
        let entry = &self.entries[*matched.value];

        let params: HashMap<String, String> = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        match entry.handlers.get(method) {
            Some(handler) => RouteMatch::Matched { handler, params },
            None => RouteMatch::MethodNotAllowed,
        }
    }
}
