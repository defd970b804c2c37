use serde_json::json;
use smartlinks::LinkMapError;
use smartlinks::links::{
    Anchor, ArticleInfo, ElementAnchor, EndpointTemplate, HttpTransport, LinkMapper,
    MapperSettings, PublisherId, SmartLinkTransport,
};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn anchors(urls: &[&str]) -> Vec<ElementAnchor> {
    urls.iter()
        .map(|url| ElementAnchor::detached("href", url))
        .collect()
}

fn mapper_for(server: &MockServer) -> LinkMapper<ElementAnchor> {
    let endpoint = EndpointTemplate::new(format!(
        "{}/api/v1/publishers/{{publisher_id}}/linkmate/smart_links/",
        server.uri()
    ));
    let transport: Arc<dyn SmartLinkTransport> =
        Arc::new(HttpTransport::new(&endpoint, &PublisherId::Numeric(42), 5));
    LinkMapper::new(
        MapperSettings::default(),
        ArticleInfo::new(Some("Gift Guide".into()), "https://blog.example/gifts"),
        transport,
    )
}

fn smart_links_body(links: serde_json::Value) -> serde_json::Value {
    json!({"data": [{"smart_links": links}]})
}

#[tokio::test]
async fn posts_payload_and_maps_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/publishers/42/linkmate/smart_links/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "article": {"name": "Gift Guide", "url": "https://blog.example/gifts"},
            "links": [
                {"raw_url": "http://a.com", "exclusive_match_requested": false},
                {"raw_url": "http://b.com#locklink", "exclusive_match_requested": true}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(smart_links_body(json!([
            {"url": "http://a.com", "auction_id": "X1", "merchant": "acme"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let mapper = mapper_for(&server);
    let page = anchors(&["http://a.com", "http://b.com#locklink", "http://c.com#donotlink"]);
    let result = mapper.reconcile(page.clone());
    assert!(result.immediate.is_none());

    let mapping = result.pending.expect("request issued").await.unwrap();
    assert_eq!(mapping.len(), 3);
    assert_eq!(
        mapping[0].replacement_url.as_deref(),
        Some("https://shop-links.co/X1/?amp=true")
    );
    assert!(mapping[1..].iter().all(|r| r.replacement_url.is_none()));
}

#[tokio::test]
async fn same_anchors_do_not_hit_the_api_twice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(smart_links_body(json!([
            {"url": "http://a.com", "auction_id": "X1"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let mapper = mapper_for(&server);
    mapper
        .reconcile(anchors(&["http://a.com"]))
        .settle()
        .await
        .unwrap();

    let again = mapper.reconcile(anchors(&["http://a.com"]));
    assert!(again.immediate.is_none());
    assert!(!again.is_pending());
}

#[tokio::test]
async fn changed_page_gets_stale_mapping_then_fresh_one() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "article": {"name": "Gift Guide", "url": "https://blog.example/gifts"},
            "links": [{"raw_url": "http://a.com", "exclusive_match_requested": false}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(smart_links_body(json!([
            {"url": "http://a.com", "auction_id": "OLD"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "article": {"name": "Gift Guide", "url": "https://blog.example/gifts"},
            "links": [
                {"raw_url": "http://a.com", "exclusive_match_requested": false},
                {"raw_url": "http://b.com", "exclusive_match_requested": false}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(smart_links_body(json!([
            {"url": "http://a.com", "auction_id": "NEW_A"},
            {"url": "http://b.com", "auction_id": "NEW_B"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let mapper = mapper_for(&server);
    mapper
        .reconcile(anchors(&["http://a.com"]))
        .settle()
        .await
        .unwrap();

    let result = mapper.reconcile(anchors(&["http://a.com", "http://b.com"]));
    let stale: Vec<_> = result
        .immediate
        .as_ref()
        .expect("stale mapping")
        .iter()
        .map(|r| r.replacement_url.clone())
        .collect();
    assert_eq!(
        stale,
        vec![Some("https://shop-links.co/OLD/?amp=true".to_string()), None]
    );

    let fresh = result.settle().await.unwrap().unwrap();
    let fresh: Vec<_> = fresh.iter().map(|r| r.replacement_url.clone()).collect();
    assert_eq!(
        fresh,
        vec![
            Some("https://shop-links.co/NEW_A/?amp=true".to_string()),
            None,
            None,
            Some("https://shop-links.co/NEW_B/?amp=true".to_string()),
        ]
    );
}

#[tokio::test]
async fn server_error_surfaces_and_next_call_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(smart_links_body(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let mapper = mapper_for(&server);
    let err = mapper
        .reconcile(anchors(&["http://a.com"]))
        .settle()
        .await
        .unwrap_err();
    match err {
        LinkMapError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!mapper.has_cached_response());

    let mapping = mapper
        .reconcile(anchors(&["http://a.com"]))
        .settle()
        .await
        .unwrap()
        .unwrap();
    assert!(mapping.is_empty());
    assert!(mapper.has_cached_response());
}

#[tokio::test]
async fn unexpected_shape_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let mapper = mapper_for(&server);
    let err = mapper
        .reconcile(anchors(&["http://a.com"]))
        .settle()
        .await
        .unwrap_err();
    assert!(matches!(err, LinkMapError::MalformedResponse(_)));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let mapper = mapper_for(&server);
    let err = mapper
        .reconcile(anchors(&["http://a.com"]))
        .settle()
        .await
        .unwrap_err();
    assert!(matches!(err, LinkMapError::MalformedResponse(_)));
}

#[tokio::test]
async fn rewritten_anchor_keeps_set_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(smart_links_body(json!([
            {"url": "http://a.com", "auction_id": "X1"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let mapper = mapper_for(&server);
    let page = anchors(&["http://a.com"]);
    let mapping = mapper
        .reconcile(page.clone())
        .settle()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(smartlinks::links::apply_replacements(&mapping), 1);
    assert_eq!(page[0].link_value(), "https://shop-links.co/X1/?amp=true");

    // The cached set shares the rewritten element, so the page still matches.
    let again = mapper.reconcile(page);
    assert!(!again.is_pending());
}
