//! # regex-router
//!
//! regex-router is a small HTTP request router for [hyper](https://hyper.rs) whose route
//! patterns are regular expressions with inline, optionally named, capture tokens.
//!
//! ## Features
//!
//! **Regex patterns:** A pattern is matched against the whole request path. Literal text and
//! regex syntax can be mixed freely, and every capture token becomes a path variable:
//! `/users/{id:(\d+)}` only matches numeric ids and exposes them under `id`.
//!
//! **First registered, first matched:** Routes are tried in the order they were registered, and
//! the first one whose pattern and method match wins. Routes whose pattern matches but whose
//! method does not are collected into the `Allow` header of a `405 Method Not Allowed` response.
//!
//! **Groups:** Routers can be mounted under a path prefix with a [`Group`], which rewrites their
//! patterns once, when they are attached.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use regex_router::{vars, unnamed_vars, Group, Router};
//! use hyper::{Request, Response, Body, Error};
//!
//! async fn index(_: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::new("Hello, World!".into()))
//! }
//!
//! async fn user(req: Request<Body>) -> Result<Response<Body>, Error> {
//!     let vars = vars(&req);
//!     Ok(Response::new(format!("user {}", vars.get("id").unwrap_or_default()).into()))
//! }
//!
//! async fn file(req: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::new(unnamed_vars(&req).join("/").into()))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = Router::default()
//!         .get("/users/{id:(\\d+)}", user)
//!         .get("/files/(.+)", file);
//!
//!     let site = Router::default().get("/", index);
//!
//!     let group = Group::default()
//!         .attach("/api", api)
//!         .attach("/", site);
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(group.into_service())
//!         .await;
//! }
//! ```
//!
//! ### Pattern syntax
//!
//! ```ignore
//!  Syntax               Variable key
//!  {name: (regex)}      name
//!  {(regex)}            _
//!  name:(regex)         name
//!  (regex)              _
//!  /  *  /*             matches any path
//! ```
//!
//! Unnamed tokens all land under the `_` key, in the order they appear in the pattern. They can
//! be read with [`unnamed_vars`].

#![forbid(unsafe_code)]

pub mod pattern;

#[doc(hidden)]
pub mod router;

#[doc(hidden)]
pub mod group;

#[doc(hidden)]
pub mod service;

#[doc(inline)]
pub use router::{Handler, Route, Router};

#[doc(inline)]
pub use group::Group;

#[doc(inline)]
pub use pattern::{unnamed_vars, vars, MatchedPattern, Vars};

// test the code examples in README.md
#[cfg(doctest)]
mod test_readme {
  macro_rules! doc_comment {
    ($x:expr) => {
        #[doc = $x]
        extern {}
    };
  }

  doc_comment!(include_str!("../README.md"));
}
