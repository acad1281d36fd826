//! [`Router`](crate::Router) is an HTTP request router matching paths against
//! regular expression patterns.
//!
//! Routes are kept in registration order and tried one after the other: the
//! first route whose pattern matches the path and whose method matches the
//! request wins, no matter how specific later routes are.
//!
//! ```rust,no_run
//! use regex_router::{vars, Router};
//! use hyper::{Request, Response, Body, Error};
//!
//! async fn index(_: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::new("Hello, World!".into()))
//! }
//!
//! async fn hello(req: Request<Body>) -> Result<Response<Body>, Error> {
//!     let vars = vars(&req);
//!     Ok(Response::new(format!("Hello, {}", vars.get("user").unwrap_or("stranger")).into()))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::default()
//!         .get("/", index)
//!         .get("/hello/{user:([^/]+)}", hello);
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.into_service())
//!         .await;
//! }
//!```
//!
//! The patterns `/`, `*` and `/*` match every path, so a route registered
//! with one of them shadows every route registered after it.
//!
//! When the path matches one or more routes but none of them accepts the
//! request method, the router answers `405 Method Not Allowed` with an `Allow`
//! header listing the methods of those routes, in registration order.
//! Otherwise it answers `404 Not Found`.
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use hyper::{Body, Method, Request, Response};
use tracing::debug;

use crate::pattern::{self, MatchedPattern};
use crate::service::{Dispatch, MakeRouterService, ResponseFut, ResponseFutKind};

/// A single registered route.
pub struct Route {
    pub(crate) method: Option<Method>,
    pub(crate) pattern: String,
    handler: Box<dyn Handler>,
}

impl Route {
    /// The method this route accepts, or `None` if it accepts any method.
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    // an empty pattern stands for the pattern already stamped on the request
    fn applies<B>(&self, req: &Request<B>) -> bool {
        pattern::extract_from(req, &self.pattern).is_ok()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// Router dispatches requests to different handlers via configurable routes.
#[derive(Default)]
pub struct Router {
    pub(crate) routes: Vec<Route>,
    not_found: Option<Box<dyn Handler>>,
    method_not_allowed: Option<Box<dyn Handler>>,
}

impl Router {
    /// Register a handler for a specific pattern and method.
    /// ```rust
    /// use regex_router::Router;
    /// use hyper::{Response, Body, Method};
    ///
    /// async fn teapot(_: hyper::Request<Body>) -> hyper::Result<Response<Body>> {
    ///     Ok(Response::new(Body::from("I am a teapot!")))
    /// }
    ///
    /// let router = Router::default().handle("/teapot", Method::GET, teapot);
    /// assert_eq!(router.routes()[0].pattern(), "/teapot");
    /// ```
    pub fn handle(
        self,
        pattern: impl Into<String>,
        method: Method,
        handler: impl Handler + 'static,
    ) -> Self {
        self.add(Some(method), pattern.into(), handler)
    }

    /// Register a handler for requests of any method.
    pub fn any(self, pattern: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.add(None, pattern.into(), handler)
    }

    fn add(
        mut self,
        method: Option<Method>,
        pattern: String,
        handler: impl Handler + 'static,
    ) -> Self {
        self.routes.push(Route {
            method,
            pattern,
            handler: Box::new(handler),
        });
        self
    }

    /// Register a handler for `GET` requests
    pub fn get(self, pattern: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handle(pattern, Method::GET, handler)
    }

    /// Register a handler for `HEAD` requests
    pub fn head(self, pattern: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handle(pattern, Method::HEAD, handler)
    }

    /// Register a handler for `OPTIONS` requests
    pub fn options(self, pattern: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handle(pattern, Method::OPTIONS, handler)
    }

    /// Register a handler for `POST` requests
    pub fn post(self, pattern: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handle(pattern, Method::POST, handler)
    }

    /// Register a handler for `PUT` requests
    pub fn put(self, pattern: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handle(pattern, Method::PUT, handler)
    }

    /// Register a handler for `PATCH` requests
    pub fn patch(self, pattern: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handle(pattern, Method::PATCH, handler)
    }

    /// Register a handler for `DELETE` requests
    pub fn delete(self, pattern: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handle(pattern, Method::DELETE, handler)
    }

    /// Register a handler for `CONNECT` requests
    pub fn connect(self, pattern: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handle(pattern, Method::CONNECT, handler)
    }

    /// Register a handler for `TRACE` requests
    pub fn trace(self, pattern: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handle(pattern, Method::TRACE, handler)
    }

    /// Configurable handler which is called when no matching route is
    /// found.
    pub fn not_found(mut self, handler: impl Handler + 'static) -> Self {
        self.not_found = Some(Box::new(handler));
        self
    }

    /// A configurable handler which is called when the path matches but no
    /// route accepts the request method.
    /// The `Allow` header is added to its response unless the handler set one.
    pub fn method_not_allowed(mut self, handler: impl Handler + 'static) -> Self {
        self.method_not_allowed = Some(Box::new(handler));
        self
    }

    /// The registered routes, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Whether any route matches the request path, regardless of its method.
    /// ```rust
    /// use regex_router::Router;
    /// use hyper::{Body, Request, Response};
    ///
    /// async fn create(_: Request<Body>) -> hyper::Result<Response<Body>> {
    ///     Ok(Response::new(Body::empty()))
    /// }
    ///
    /// let router = Router::default().post("/users", create);
    ///
    /// let req = Request::get("/users").body(()).unwrap();
    /// assert!(router.can_serve(&req));
    ///
    /// let req = Request::get("/posts").body(()).unwrap();
    /// assert!(!router.can_serve(&req));
    /// ```
    pub fn can_serve<B>(&self, req: &Request<B>) -> bool {
        self.routes.iter().any(|route| route.applies(req))
    }

    /// Converts the `Router` into a `Service` which you can serve directly with `Hyper`.
    /// ```rust,no_run
    /// # use regex_router::Router;
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let router = Router::default();
    ///
    /// hyper::Server::bind(&([127, 0, 0, 1], 3030).into())
    ///     .serve(router.into_service())
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_service(self) -> MakeRouterService<Self> {
        MakeRouterService::new(self)
    }

    /// Routes a request to the first matching route.
    ///
    /// The pattern of that route is stored in the request's extensions as a
    /// [`MatchedPattern`] before the handler is called, so the handler can
    /// read its variables with [`vars`](crate::vars).
    pub fn serve(&self, mut req: Request<Body>) -> ResponseFut {
        let mut allowed: Vec<&Method> = Vec::new();

        for route in &self.routes {
            if !route.applies(&req) {
                continue;
            }

            if let Some(ref method) = route.method {
                if method != req.method() {
                    allowed.push(method);
                    continue;
                }
            }

            debug!(
                method = %req.method(),
                path = req.uri().path(),
                pattern = route.pattern.as_str(),
                "route matched"
            );
            MatchedPattern::stamp(req.extensions_mut(), &route.pattern);
            return ResponseFutKind::Boxed(route.handler.handle(req)).into();
        }

        if !allowed.is_empty() {
            let allow = allowed
                .iter()
                .map(|method| method.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            debug!(
                method = %req.method(),
                path = req.uri().path(),
                allow = allow.as_str(),
                "method not allowed"
            );

            return match self.method_not_allowed {
                Some(ref handler) => ResponseFutKind::BoxedAllow(handler.handle(req), allow).into(),
                None => ResponseFutKind::MethodNotAllowed(allow).into(),
            };
        }

        debug!(method = %req.method(), path = req.uri().path(), "no route matched");

        match self.not_found {
            Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
            None => ResponseFutKind::NotFound.into(),
        }
    }
}

impl Dispatch for Router {
    fn dispatch(&self, req: Request<Body>) -> ResponseFut {
        self.serve(req)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .finish()
    }
}

/// Represents a HTTP handler function.
/// This trait is implemented for asynchronous functions that take a `Request` and return a
/// `Result<Response<Body>, hyper::Error>`
/// ```rust
/// # use regex_router::Handler;
/// # use hyper::{Request, Response, Body};
/// async fn hello(_: Request<Body>) -> Result<Response<Body>, hyper::Error> {
///     Ok(Response::new(Body::empty()))
/// }
///
/// let handler: Box<dyn Handler> = Box::new(hello);
/// ```
pub trait Handler: Send + Sync {
    fn handle(
        &self,
        req: Request<Body>,
    ) -> Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send + Sync>>;
}

impl<F, R> Handler for F
where
    F: Fn(Request<Body>) -> R + Send + Sync,
    R: Future<Output = Result<Response<Body>, hyper::Error>> + Send + Sync + 'static,
{
    fn handle(
        &self,
        req: Request<Body>,
    ) -> Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send + Sync>> {
        Box::pin(self(req))
    }
}
