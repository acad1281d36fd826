//! Glue between the routers and hyper.
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{future, ready};
use hyper::service::Service;
use hyper::{header, Body, Request, Response, StatusCode};

/// Anything that can route a request to a response: a [`Router`](crate::Router)
/// or a [`Group`](crate::Group).
pub trait Dispatch: Send + Sync + 'static {
    fn dispatch(&self, req: Request<Body>) -> ResponseFut;
}

#[doc(hidden)]
pub struct MakeRouterService<D>(RouterService<D>);

impl<D: Dispatch> MakeRouterService<D> {
    pub(crate) fn new(dispatch: D) -> Self {
        MakeRouterService(RouterService(Arc::new(dispatch)))
    }
}

impl<D: Dispatch, T> Service<T> for MakeRouterService<D> {
    type Response = RouterService<D>;
    type Error = hyper::Error;
    type Future = future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
        let service = self.0.clone();
        future::ok(service)
    }
}

#[doc(hidden)]
pub struct RouterService<D>(Arc<D>);

impl<D> Clone for RouterService<D> {
    fn clone(&self) -> Self {
        RouterService(Arc::clone(&self.0))
    }
}

impl<D: Dispatch> Service<Request<Body>> for RouterService<D> {
    type Response = Response<Body>;
    type Error = hyper::Error;
    type Future = ResponseFut;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.0.dispatch(req)
    }
}

pub(crate) type BoxFut = Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send + Sync>>;

/// The response of a routed request.
pub struct ResponseFut {
    kind: ResponseFutKind,
}

impl From<ResponseFutKind> for ResponseFut {
    fn from(kind: ResponseFutKind) -> Self {
        Self { kind }
    }
}

pub(crate) enum ResponseFutKind {
    Boxed(BoxFut),
    // a custom 405 handler, whose response still needs the `Allow` header
    BoxedAllow(BoxFut, String),
    MethodNotAllowed(String),
    NotFound,
}

impl Future for ResponseFut {
    type Output = hyper::Result<Response<Body>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let ready = match self.kind {
            ResponseFutKind::Boxed(ref mut fut) => ready!(fut.as_mut().poll(cx)),
            ResponseFutKind::BoxedAllow(ref mut fut, ref allowed) => {
                ready!(fut.as_mut().poll(cx)).map(|mut res| {
                    if !res.headers().contains_key(header::ALLOW) {
                        if let Ok(value) = allowed.parse() {
                            res.headers_mut().insert(header::ALLOW, value);
                        }
                    }
                    res
                })
            }
            ResponseFutKind::NotFound => Ok(Response::builder()
                .status(StatusCode::NOT_FOUND)
                .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(Body::from("404 page not found"))
                .unwrap()),
            ResponseFutKind::MethodNotAllowed(ref allowed) => Ok(Response::builder()
                .header(header::ALLOW, allowed.as_str())
                .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .body(Body::from("405 method not allowed"))
                .unwrap()),
        };

        Poll::Ready(ready)
    }
}
