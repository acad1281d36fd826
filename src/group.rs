//! Groups compose several routers under path prefixes.
//!
//! ```rust
//! use regex_router::{Group, Router};
//! use hyper::{Body, Request, Response};
//!
//! async fn list(_: Request<Body>) -> hyper::Result<Response<Body>> {
//!     Ok(Response::new(Body::empty()))
//! }
//!
//! let users = Router::default()
//!     .get("/users", list)
//!     .get("users/{id:(\\d+)}", list);
//!
//! let group = Group::default().attach("/api/", users);
//!
//! let patterns: Vec<_> = group.routers()[0].routes().iter().map(|r| r.pattern()).collect();
//! assert_eq!(patterns, ["/api/users", "/api/users/{id:(\\d+)}"]);
//! ```
use std::fmt;

use hyper::{Body, Request};
use tracing::debug;

use crate::router::{Handler, Router};
use crate::service::{Dispatch, MakeRouterService, ResponseFut, ResponseFutKind};

/// An ordered list of routers. A request is served by the first router that
/// has a route matching its path.
#[derive(Default)]
pub struct Group {
    routers: Vec<Router>,
    not_found: Option<Box<dyn Handler>>,
}

impl Group {
    /// Creates a group from routers as they are, without prefixing their
    /// patterns.
    pub fn new(routers: impl IntoIterator<Item = Router>) -> Self {
        Self {
            routers: routers.into_iter().collect(),
            not_found: None,
        }
    }

    /// Prefixes every pattern of `router` with `root` and appends the router
    /// to the group.
    ///
    /// The router is consumed, so its patterns are rewritten exactly once.
    /// Routes are dropped if `root` or their own pattern is empty. The
    /// wildcards `/*` and `*` become `/.*` and `.*` respectively, the latter
    /// being appended to `root` as-is.
    /// ```rust
    /// use regex_router::{Group, Router};
    /// use hyper::{Body, Request, Response};
    ///
    /// async fn serve_file(_: Request<Body>) -> hyper::Result<Response<Body>> {
    ///     Ok(Response::new(Body::empty()))
    /// }
    ///
    /// let files = Router::default().get("/*", serve_file).get("", serve_file);
    /// let group = Group::default().attach("/files", files);
    ///
    /// let routes = group.routers()[0].routes();
    /// assert_eq!(routes.len(), 1);
    /// assert_eq!(routes[0].pattern(), "/files/.*");
    /// ```
    pub fn attach(mut self, root: &str, mut router: Router) -> Self {
        router.routes = router
            .routes
            .into_iter()
            .filter_map(|mut route| match join(root, &route.pattern) {
                Some(pattern) => {
                    route.pattern = pattern;
                    Some(route)
                }
                None => {
                    debug!(root, pattern = route.pattern.as_str(), "dropping malformed route");
                    None
                }
            })
            .collect();

        self.routers.push(router);
        self
    }

    /// Configurable handler which is called when no router can serve the
    /// request.
    pub fn not_found(mut self, handler: impl Handler + 'static) -> Self {
        self.not_found = Some(Box::new(handler));
        self
    }

    pub fn routers(&self) -> &[Router] {
        &self.routers
    }

    /// Converts the `Group` into a `Service` which you can serve directly with `Hyper`.
    pub fn into_service(self) -> MakeRouterService<Self> {
        MakeRouterService::new(self)
    }

    /// Hands the request to the first router with a route matching its path.
    ///
    /// Method mismatches are resolved by that router alone: a `405` from the
    /// selected router is final, even if a later router would accept the
    /// method.
    pub fn serve(&self, req: Request<Body>) -> ResponseFut {
        if let Some((index, router)) = self
            .routers
            .iter()
            .enumerate()
            .find(|(_, router)| router.can_serve(&req))
        {
            debug!(path = req.uri().path(), router = index, "delegating to router");
            return router.serve(req);
        }

        debug!(method = %req.method(), path = req.uri().path(), "no router matched");

        match self.not_found {
            Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
            None => ResponseFutKind::NotFound.into(),
        }
    }
}

impl Dispatch for Group {
    fn dispatch(&self, req: Request<Body>) -> ResponseFut {
        self.serve(req)
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("routers", &self.routers)
            .finish()
    }
}

fn join(root: &str, pattern: &str) -> Option<String> {
    if root.is_empty() || pattern.is_empty() {
        return None;
    }

    let pattern = match pattern {
        "/*" => "/.*",
        "*" => return Some(format!("{}.*", root)),
        pattern => pattern,
    };

    let joined = match (root.ends_with('/'), pattern.starts_with('/')) {
        (true, true) => format!("{}{}", root, &pattern[1..]),
        (false, false) => format!("{}/{}", root, pattern),
        _ => format!("{}{}", root, pattern),
    };

    Some(joined)
}
