use std::sync::Arc;

use hyper::{header, Body, Method, Request, Response, StatusCode};
use regex_router::{unnamed_vars, vars, MatchedPattern, Router};

async fn h1(_: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("h1")))
}

async fn h2(_: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("h2")))
}

async fn echo_vars(req: Request<Body>) -> hyper::Result<Response<Body>> {
    let vars = vars(&req);
    let mut pairs: Vec<String> = vars
        .iter()
        .map(|(key, values)| format!("{}={}", key, values.join(",")))
        .collect();
    pairs.sort();
    Ok(Response::new(Body::from(pairs.join(";"))))
}

async fn echo_unnamed(req: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from(unnamed_vars(&req).join("|"))))
}

async fn echo_pattern(req: Request<Body>) -> hyper::Result<Response<Body>> {
    let pattern = req
        .extensions()
        .get::<MatchedPattern>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_default();
    Ok(Response::new(Body::from(pattern)))
}

async fn teapot(_: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::builder()
        .status(StatusCode::IM_A_TEAPOT)
        .body(Body::empty())
        .unwrap())
}

fn request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

async fn body(res: Response<Body>) -> String {
    let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn method_precedence() {
    let router = Router::default().get("/x", h1).post("/x", h2);

    let res = router.serve(request(Method::GET, "/x")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await, "h1");

    let res = router.serve(request(Method::POST, "/x")).await.unwrap();
    assert_eq!(body(res).await, "h2");

    let res = router.serve(request(Method::DELETE, "/x")).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()[header::ALLOW], "GET, POST");
    assert_eq!(body(res).await, "405 method not allowed");
}

#[tokio::test]
async fn allow_keeps_duplicates_in_registration_order() {
    let router = Router::default()
        .post("/x", h1)
        .get("/(x)", h1)
        .post("/.*", h1);

    let res = router.serve(request(Method::PUT, "/x")).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()[header::ALLOW], "POST, GET, POST");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let router = Router::default().get("/x", h1);

    let res = router.serve(request(Method::GET, "/y")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(res).await, "404 page not found");
}

#[tokio::test]
async fn first_registered_wins() {
    let router = Router::default().get("/(.*)", h1).get("/users", h2);

    let res = router.serve(request(Method::GET, "/users")).await.unwrap();
    assert_eq!(body(res).await, "h1");
}

#[tokio::test]
async fn method_mismatch_does_not_stop_the_scan() {
    let router = Router::default().post("/users", h1).get("/(\\w+)", h2);

    let res = router.serve(request(Method::GET, "/users")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await, "h2");
}

#[tokio::test]
async fn any_method() {
    let router = Router::default().any("/x", h1);

    for method in &[Method::GET, Method::DELETE, Method::PATCH] {
        let res = router.serve(request(method.clone(), "/x")).await.unwrap();
        assert_eq!(body(res).await, "h1");
    }
}

#[tokio::test]
async fn named_variables() {
    let router = Router::default().get("/users/{id:(\\d+)}", echo_vars);

    let res = router.serve(request(Method::GET, "/users/42")).await.unwrap();
    assert_eq!(body(res).await, "id=42");

    let res = router.serve(request(Method::GET, "/users/abc")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mixed_variables() {
    let router = Router::default().get("/{(\\w+)}/post:(\\d+)/(\\w+)", echo_vars);

    let res = router
        .serve(request(Method::GET, "/blog/7/comments"))
        .await
        .unwrap();
    assert_eq!(body(res).await, "_=blog,comments;post=7");
}

#[tokio::test]
async fn unnamed_variables() {
    let router = Router::default().get("/files/(\\w+)/(.+)", echo_unnamed);

    let res = router
        .serve(request(Method::GET, "/files/docs/a/b.txt"))
        .await
        .unwrap();
    assert_eq!(body(res).await, "docs|a/b.txt");
}

#[tokio::test]
async fn matched_pattern_is_stamped() {
    let router = Router::default()
        .post("/users/(\\d+)", h1)
        .get("/users/{id:(\\d+)}", echo_pattern);

    let res = router.serve(request(Method::GET, "/users/1")).await.unwrap();
    assert_eq!(body(res).await, "/users/{id:(\\d+)}");
}

#[tokio::test]
async fn empty_pattern_reuses_the_outer_match() {
    let inner = Arc::new(Router::default().get("", echo_pattern).get("/y", h2));

    let outer = Router::default().get(r"/x/(\d+)", move |req: Request<Body>| inner.serve(req));

    let res = outer.serve(request(Method::GET, "/x/1")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await, r"/x/(\d+)");
}

#[tokio::test]
async fn empty_pattern_without_outer_match_is_skipped() {
    let router = Router::default().get("", h1);

    let res = router.serve(request(Method::GET, "/x")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn can_serve_falls_back_to_the_outer_match() {
    let inner = Router::default().get("", h2);
    assert!(!inner.can_serve(&request(Method::GET, "/x")));

    let outer = Router::default().get("/x", move |req: Request<Body>| {
        let claimed = inner.can_serve(&req);
        async move { Ok::<_, hyper::Error>(Response::new(Body::from(claimed.to_string()))) }
    });

    let res = outer.serve(request(Method::GET, "/x")).await.unwrap();
    assert_eq!(body(res).await, "true");
}

#[tokio::test]
async fn wildcards() {
    for pattern in &["/", "*", "/*"] {
        let router = Router::default().get(*pattern, echo_vars);
        let res = router.serve(request(Method::GET, "/a/b/c")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body(res).await, "");
    }
}

#[tokio::test]
async fn broken_patterns_are_skipped() {
    let router = Router::default()
        .get("/([a-)", h1)
        .get("/(?:a)", h1)
        .get("/a", h2);

    let res = router.serve(request(Method::GET, "/a")).await.unwrap();
    assert_eq!(body(res).await, "h2");
}

#[tokio::test]
async fn custom_fallbacks() {
    let router = Router::default()
        .get("/x", h1)
        .not_found(teapot)
        .method_not_allowed(teapot);

    let res = router.serve(request(Method::GET, "/y")).await.unwrap();
    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);

    let res = router.serve(request(Method::POST, "/x")).await.unwrap();
    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(res.headers()[header::ALLOW], "GET");
}

#[test]
fn can_serve_ignores_method() {
    let router = Router::default().post("/x", h1);

    assert!(router.can_serve(&request(Method::GET, "/x")));
    assert!(!router.can_serve(&request(Method::GET, "/y")));
}

#[test]
fn can_serve_does_not_stamp() {
    let router = Router::default().get("/x", h1);
    let req = request(Method::GET, "/x");

    assert!(router.can_serve(&req));
    assert!(req.extensions().get::<MatchedPattern>().is_none());
}
