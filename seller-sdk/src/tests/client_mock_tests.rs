//! Mock server tests for the seller client
//!
//! These tests use WireMock to simulate the seller API and drive the client
//! over real HTTP with the reqwest transport.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::{RequestOptions, SellerClient};
    use crate::error::ErrorKind;
    use crate::resilience::RetryConfig;
    use crate::tests::support::{RecordingSleeper, SELLER_KEY};

    /// Creates a client pointed at the mock server
    fn create_test_client(base_url: &str, max_retries: u32) -> (SellerClient, std::sync::Arc<RecordingSleeper>) {
        let sleeper = RecordingSleeper::new();
        let client = SellerClient::builder()
            .base_url(base_url)
            .token(SELLER_KEY)
            .timeout(Duration::from_secs(5))
            .rate_limit(100, Duration::from_secs(60))
            .retry_config(RetryConfig {
                max_retries,
                ..RetryConfig::default()
            })
            .sleeper(sleeper.clone())
            .build()
            .expect("Failed to build seller client");
        (client, sleeper)
    }

    #[tokio::test]
    async fn test_get_with_query_and_credential() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/supplier/orders"))
            .and(query_param("dateFrom", "2024-01-01"))
            .and(query_param("flag", "1"))
            .and(header("Authorization", SELLER_KEY))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"srid": "a1", "totalPrice": 1200},
                {"srid": "b2", "totalPrice": 560}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = create_test_client(&mock_server.uri(), 3);
        let orders: Vec<Value> = client
            .get(
                "/api/v1/supplier/orders",
                &json!({"dateFrom": "2024-01-01", "flag": 1}),
            )
            .await
            .unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0]["srid"], "a1");
    }

    #[tokio::test]
    async fn test_write_verbs_send_json_bodies() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/content/v2/get/cards/list"))
            .and(body_json(json!({"settings": {"cursor": {"limit": 10}}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cards": [], "cursor": {"total": 0}})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/api/v3/stocks/1"))
            .and(body_json(json!({"stocks": [{"sku": "sku-1", "amount": 5}]})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PATCH"))
            .and(path("/api/v3/supplies/WB-GI-1/orders/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/v3/supplies/WB-GI-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = create_test_client(&mock_server.uri(), 3);

        let cards: Value = client
            .post(
                "/content/v2/get/cards/list",
                &json!({"settings": {"cursor": {"limit": 10}}}),
                RequestOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(cards["cursor"]["total"], 0);

        let updated: Value = client
            .put("/api/v3/stocks/1", &json!({"stocks": [{"sku": "sku-1", "amount": 5}]}))
            .await
            .unwrap();
        assert_eq!(updated, Value::Null);

        let _: Value = client
            .patch("/api/v3/supplies/WB-GI-1/orders/7", &())
            .await
            .unwrap();
        let _: Value = client.delete("/api/v3/supplies/WB-GI-1", &()).await.unwrap();

        assert_eq!(client.rate_limiter().current_count(), 4);
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/supplier/stocks"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .up_to_n_times(2)
            .expect(2)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/supplier/stocks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"quantity": 3}])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, sleeper) = create_test_client(&mock_server.uri(), 3);
        let stocks: Vec<Value> = client.get("/api/v1/supplier/stocks", &()).await.unwrap();

        assert_eq!(stocks[0]["quantity"], 3);
        assert_eq!(sleeper.count(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_retry_after_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/supplier/incomes"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("Retry-After", "30")
                    .set_body_json(json!({"title": "too many requests"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, sleeper) = create_test_client(&mock_server.uri(), 0);
        let err = client
            .get::<Value, _>("/api/v1/supplier/incomes", &())
            .await
            .unwrap_err();

        let api_error = err.as_api_error().expect("api error");
        assert_eq!(api_error.kind, ErrorKind::RateLimitExceeded);
        assert_eq!(api_error.retry_after_ms(), Some(30_000));
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn test_not_found_is_terminal() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/content/v2/cards/999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, sleeper) = create_test_client(&mock_server.uri(), 3);
        let err = client.get::<Value, _>("/content/v2/cards/999", &()).await.unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        let report = err.as_api_error().expect("api error").report();
        assert_eq!(report["url"], format!("{}/content/v2/cards/999", mock_server.uri()));
        assert!(!report.to_string().contains(SELLER_KEY));
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn test_non_json_error_body_kept_as_details() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let (client, _) = create_test_client(&mock_server.uri(), 0);
        let err = client.get::<Value, _>("/ping", &()).await.unwrap_err();

        let api_error = err.as_api_error().expect("api error");
        assert_eq!(api_error.kind, ErrorKind::ServerError);
        assert_eq!(api_error.status_code, 502);
        assert_eq!(api_error.details, Some(json!("Bad Gateway")));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let (client, _) = create_test_client("http://127.0.0.1:1", 0);
        let err = client.get::<Value, _>("/ping", &()).await.unwrap_err();

        let api_error = err.as_api_error().expect("api error");
        assert_eq!(api_error.kind, ErrorKind::NetworkError);
        assert_eq!(api_error.status_code, 0);
    }

    #[tokio::test]
    async fn test_request_timeout_override() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/content/v3/media/file"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let (client, _) = create_test_client(&mock_server.uri(), 0);
        let err = client
            .post::<Value, _>(
                "/content/v3/media/file",
                &json!({"nmId": 1}),
                RequestOptions::new().timeout(Duration::from_millis(50)),
            )
            .await
            .unwrap_err();

        let api_error = err.as_api_error().expect("api error");
        assert_eq!(api_error.kind, ErrorKind::TimeoutError);
        assert_eq!(api_error.status_code, 0);
    }

    #[tokio::test]
    async fn test_set_base_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"TS": "2024-01-01T00:00:00Z"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (mut client, _) = create_test_client("https://suppliers-api.wildberries.ru", 0);
        client.set_base_url(&mock_server.uri()).unwrap();
        assert_eq!(client.base_url(), mock_server.uri());

        let body: Value = client.get("ping", &()).await.unwrap();
        assert_eq!(body["TS"], "2024-01-01T00:00:00Z");
    }
}
