//! Route patterns are regular expressions with inline capture tokens.
//!
//! A capture token wraps a parenthesized sub-expression and may carry a name:
//! ```ignore
//!  Syntax               Key
//!  {name: (expr)}       name
//!  {(expr)}             _
//!  name:(expr)          name
//!  (expr)               _
//! ```
//!
//! Everything outside a token is used as-is, so literal path text and plain
//! regex syntax can be mixed freely:
//! ```ignore
//!  Pattern: /users/{id:(\d+)}/files/(.+)
//!
//!   /users/42/files/a.txt          match: id=["42"], _=["a.txt"]
//!   /users/42/files/               no match
//!   /users/bob/files/a.txt         no match
//! ```
//!
//! The patterns `/`, `*` and `/*` match every path and capture nothing.
//!
//! Tokens are located textually, the sub-expression being the shortest
//! `(...)` span. Parentheses are not balanced, and sub-expressions containing
//! `{`, `}` or `:` are not supported.
use std::collections::HashMap;

use hyper::http::Extensions;
use hyper::Request;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::trace;

/// The key unnamed capture tokens are stored under.
pub const UNNAMED: &str = "_";

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)(?:\{\s*?(?:([^:/{}\s]+?)\s*?:\s*?)?(\(.*?\))\s*?\}|(?:([^:/{}\s]+?)\s*?:\s*?)?(\(.*?\)))",
    )
    .unwrap()
});

/// Reasons a pattern does not apply to a path.
///
/// None of these ever reach the client: a route whose pattern fails is
/// simply skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The pattern was empty and the request carries no [`MatchedPattern`].
    #[error("no routing pattern available")]
    NoPatternAvailable,

    /// The path does not satisfy the pattern, or the pattern is not a valid
    /// regular expression.
    #[error("url did not match the routing pattern")]
    NoPatternMatch,

    /// The pattern compiled to fewer capture groups than it has tokens.
    #[error("routing pattern has fewer submatches than capture tokens")]
    MalformedSubmatches,
}

/// Variables captured from a request path, keyed by token name.
///
/// Every key maps to the values captured under it in left-to-right order, so
/// unnamed tokens all accumulate under [`UNNAMED`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars {
    inner: HashMap<String, Vec<String>>,
}

impl Vars {
    /// Returns the first value captured under `key`.
    /// ```rust
    /// let vars = regex_router::pattern::extract("/users/{id:(\\d+)}", "/users/42").unwrap();
    /// assert_eq!(vars.get("id"), Some("42"));
    /// assert_eq!(vars.get("name"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Returns every value captured under `key`, or an empty slice.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Values of the unnamed tokens, in pattern order.
    pub fn unnamed(&self) -> &[String] {
        self.get_all(UNNAMED)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Consumes the variables, keeping only the unnamed values.
    pub fn into_unnamed(mut self) -> Vec<String> {
        self.inner.remove(UNNAMED).unwrap_or_default()
    }

    fn add(&mut self, key: &str, value: String) {
        self.inner.entry(key.to_owned()).or_default().push(value);
    }
}

/// The pattern of the route that claimed a request.
///
/// The router stores it in the request's extensions right before calling the
/// handler, which lets [`vars`] recover the handler's own match. Only the
/// first non-empty pattern is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPattern(String);

impl MatchedPattern {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn stamp(extensions: &mut Extensions, pattern: &str) {
        if extensions
            .get::<MatchedPattern>()
            .map_or(false, |matched| !matched.is_empty())
        {
            return;
        }
        extensions.insert(MatchedPattern(pattern.to_owned()));
    }
}

/// Matches `path` against `pattern` and returns the captured variables.
///
/// Patterns are compiled with Unicode support, so classes such as `\d` and
/// `\w` also match non-ASCII digits and letters. Request paths reaching a
/// [`Router`](crate::Router) are always ASCII, but paths passed here directly
/// may not be; spell out `[0-9]` or `[A-Za-z0-9_]` to stay ASCII-only.
/// ```rust
/// use regex_router::pattern::{extract, Error};
///
/// let vars = extract("/{(\\w+)}/(\\d+)", "/blog/2").unwrap();
/// assert_eq!(vars.unnamed(), ["blog", "2"]);
///
/// assert_eq!(extract("/users/(\\d+)", "/users/bob"), Err(Error::NoPatternMatch));
/// ```
pub fn extract(pattern: &str, path: &str) -> Result<Vars, Error> {
    if pattern.is_empty() {
        return Err(Error::NoPatternAvailable);
    }

    if is_wildcard(pattern) {
        return Ok(Vars::default());
    }

    let (expanded, keys) = expand(pattern);

    let re = match Regex::new(&format!("(?m)^{}$", expanded)) {
        Ok(re) => re,
        Err(err) => {
            trace!(pattern, error = %err, "routing pattern is not a valid regex");
            return Err(Error::NoPatternMatch);
        }
    };

    let mut vars = Vars::default();
    let mut matched = false;
    for caps in re.captures_iter(path) {
        matched = true;
        if caps.len() - 1 < keys.len() {
            return Err(Error::MalformedSubmatches);
        }

        // surplus groups come from nested parentheses and are ignored
        for (key, group) in keys.iter().zip(caps.iter().skip(1)) {
            let value = group.map_or_else(String::new, |m| m.as_str().to_owned());
            vars.add(key, value);
        }
    }

    if !matched {
        return Err(Error::NoPatternMatch);
    }

    Ok(vars)
}

/// Like [`extract`], but an empty `pattern` falls back to the request's
/// [`MatchedPattern`].
pub fn extract_from<B>(req: &Request<B>, pattern: &str) -> Result<Vars, Error> {
    let pattern = if pattern.is_empty() {
        match req.extensions().get::<MatchedPattern>() {
            Some(matched) if !matched.is_empty() => matched.as_str(),
            _ => return Err(Error::NoPatternAvailable),
        }
    } else {
        pattern
    };

    extract(pattern, req.uri().path())
}

/// Whether `path` satisfies `pattern`.
/// ```rust
/// use regex_router::pattern::is_match;
///
/// assert!(is_match("/files/.*", "/files/a/b.txt"));
/// assert!(is_match("*", "/anything"));
/// assert!(!is_match("/files/.*", "/static/a.css"));
/// ```
pub fn is_match(pattern: &str, path: &str) -> bool {
    extract(pattern, path).is_ok()
}

/// Variables of the route that handled `req`.
///
/// Returns empty variables when called outside of a routed handler.
/// ```rust
/// use regex_router::{vars, Router};
/// use hyper::{Body, Request, Response};
///
/// async fn show(req: Request<Body>) -> hyper::Result<Response<Body>> {
///     let id = vars(&req).get("id").unwrap_or_default().to_owned();
///     Ok(Response::new(Body::from(id)))
/// }
///
/// let router = Router::default().get("/users/{id:(\\d+)}", show);
/// ```
pub fn vars<B>(req: &Request<B>) -> Vars {
    extract_from(req, "").unwrap_or_default()
}

/// Values of the unnamed tokens of the route that handled `req`.
pub fn unnamed_vars<B>(req: &Request<B>) -> Vec<String> {
    vars(req).into_unnamed()
}

fn is_wildcard(pattern: &str) -> bool {
    matches!(pattern, "/" | "*" | "/*")
}

/// Replaces every capture token with its bare sub-expression, returning the
/// resulting regex and the token keys in order.
fn expand(pattern: &str) -> (String, Vec<String>) {
    let mut expanded = pattern.to_owned();
    let mut keys = Vec::new();

    for caps in TOKEN.captures_iter(pattern) {
        // bare tokens land in groups 3 and 4
        let (name, expr) = if caps.get(4).is_some() {
            (caps.get(3), caps.get(4))
        } else {
            (caps.get(1), caps.get(2))
        };

        let expr = match expr {
            Some(expr) => expr.as_str(),
            None => continue,
        };

        expanded = expanded.replace(&caps[0], expr);
        keys.push(name.map_or(UNNAMED, |m| m.as_str()).to_owned());
    }

    (expanded, keys)
}
