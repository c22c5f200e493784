//! End-to-end tests: client → proxy → mock upstream.

use std::sync::atomic::Ordering;

mod common;

#[tokio::test]
async fn test_allowed_request_is_rewritten_and_forwarded() {
    let backend = common::start_echo_backend().await;
    let proxy = common::start_proxy(&format!("http://{}/v1?key=abc", backend.addr)).await;

    let res = common::client()
        .get(proxy.url("/api/users/me?size=preview"))
        .header("User-Agent", "agent1")
        .header("Cookie", "session=secret")
        .header("Authorization", "Bearer token")
        .header("X-Forwarded-For", "1.2.3.4")
        .header("X-Custom", "injected")
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-upstream"], "echo");

    let head = res.text().await.unwrap().to_ascii_lowercase();
    assert!(
        head.starts_with("get /v1/users/me?key=abc&size=preview http/1.1\r\n"),
        "unexpected request line: {head}"
    );
    assert!(head.contains("host: api.internal\r\n"));
    assert!(head.contains("user-agent: agent1\r\n"));
    assert!(head.contains("x-forwarded-for: 1.2.3.4, 127.0.0.1\r\n"));
    assert!(!head.contains("cookie"));
    assert!(!head.contains("authorization"));
    assert!(!head.contains("x-custom"));
    assert!(!head.contains("x-request-id"));
    assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_undeclared_path_is_404_and_not_forwarded() {
    let backend = common::start_echo_backend().await;
    let proxy = common::start_proxy(&format!("http://{}", backend.addr)).await;

    for path in ["/api/albums", "/api/users/me/", "/api/users/1/albums", "/api"] {
        let res = common::client().get(proxy.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 404, "{path}");
    }
    assert_eq!(backend.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_undeclared_method_is_405_with_allow_header() {
    let backend = common::start_echo_backend().await;
    let proxy = common::start_proxy(&format!("http://{}", backend.addr)).await;

    let res = common::client()
        .put(proxy.url("/api/items/42"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 405);
    assert_eq!(res.headers()["allow"], "GET, DELETE");
    assert_eq!(backend.hits.load(Ordering::SeqCst), 0);

    let res = common::client()
        .delete(proxy.url("/api/items/42"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_literal_template_declared_first_wins() {
    let backend = common::start_echo_backend().await;
    let proxy = common::start_proxy(&format!("http://{}", backend.addr)).await;

    // PUT is declared on "/users/me" only; "/users/{id}" would reject it.
    let res = common::client().put(proxy.url("/api/users/me")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = common::client().put(proxy.url("/api/users/42")).send().await.unwrap();
    assert_eq!(res.status(), 405);
}

#[tokio::test]
async fn test_upstream_forbidden_is_passed_through() {
    let backend = common::start_echo_backend().await;
    let proxy = common::start_proxy(&format!("http://{}", backend.addr)).await;

    let res = common::client()
        .get(proxy.url("/api/admin/secret"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403);
    let body = res.text().await.unwrap();
    assert!(body.starts_with("GET /admin/secret HTTP/1.1\r\n"));
}

#[tokio::test]
async fn test_static_files_and_spa_fallback() {
    let backend = common::start_echo_backend().await;
    let proxy = common::start_proxy(&format!("http://{}", backend.addr)).await;
    let client = common::client();

    let res = client.get(proxy.url("/assets/app.js")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "console.log('app')");

    let res = client.get(proxy.url("/photos/some-id")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "<html>spa</html>");

    assert_eq!(backend.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unreachable_upstream_is_502() {
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = probe.local_addr().unwrap();
    drop(probe);

    let proxy = common::start_proxy(&format!("http://{}", dead)).await;
    let res = common::client().get(proxy.url("/api/users/me")).send().await.unwrap();
    assert_eq!(res.status(), 502);
}
