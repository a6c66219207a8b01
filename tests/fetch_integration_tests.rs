use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;

use fed_liquidity_backend::services::fred::FredService;
use fed_liquidity_backend::services::nyfed::NyFedService;

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn sofr_fetch_parses_reference_rates() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rates/secured/sofr/search.json")
                .query_param("startDate", "2024-05-06")
                .query_param("endDate", "2024-05-07");
            then.status(200).json_body(json!({
                "refRates": [
                    { "effectiveDate": "2024-05-06", "percentRate": 5.31 },
                    { "effectiveDate": "2024-05-07", "percentRate": 5.32 },
                ]
            }));
        })
        .await;

    let nyfed = NyFedService::new(server.url(""));
    let rates = nyfed.fetch_sofr(d("2024-05-06"), d("2024-05-07")).await;

    mock.assert_async().await;
    assert_eq!(rates.len(), 2);
    assert_eq!(rates.get(&d("2024-05-06")), Some(&5.31));
    assert_eq!(rates.get(&d("2024-05-07")), Some(&5.32));
}

#[tokio::test]
async fn srf_fetch_normalizes_millions_to_billions() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/srf/all/search.json");
            then.status(200).json_body(json!({
                "srf": {
                    "operations": [
                        { "opDate": "2024-05-06", "totalAmtAccepted": 2500.0 },
                        { "opDate": "2024-05-07", "totalAmtAccepted": null },
                    ]
                }
            }));
        })
        .await;

    let nyfed = NyFedService::new(server.url(""));
    let usage = nyfed.fetch_srf(d("2024-05-06"), d("2024-05-07")).await;

    // 2500 million -> 2.5 billion; null amounts are dropped, not zeroed
    assert_eq!(usage.len(), 1);
    assert_eq!(usage.get(&d("2024-05-06")), Some(&2.5));
}

#[tokio::test]
async fn onrrp_fetch_normalizes_dollars_to_billions() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/rp/reverserepo/propositions/search.json");
            then.status(200).json_body(json!({
                "repo": {
                    "operations": [
                        { "operationDate": "2024-05-06", "totalAmtAccepted": 434_500_000_000.0 },
                    ]
                }
            }));
        })
        .await;

    let nyfed = NyFedService::new(server.url(""));
    let usage = nyfed.fetch_onrrp(d("2024-05-06"), d("2024-05-06")).await;

    assert_eq!(usage.get(&d("2024-05-06")), Some(&434.5));
}

#[tokio::test]
async fn nyfed_fetch_fails_soft_on_server_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/rates/secured/sofr/search.json");
            then.status(503).body("maintenance");
        })
        .await;

    let nyfed = NyFedService::new(server.url(""));
    let rates = nyfed.fetch_sofr(d("2024-05-06"), d("2024-05-07")).await;

    assert!(rates.is_empty());
}

#[tokio::test]
async fn repo_rate_fetch_merges_partial_series() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/rates/secured/sofr/search.json");
            then.status(200).json_body(json!({
                "refRates": [{ "effectiveDate": "2024-05-06", "percentRate": 5.31 }]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rates/unsecured/effr/search.json");
            then.status(200).json_body(json!({
                "refRates": [{ "effectiveDate": "2024-05-07", "percentRate": 5.33 }]
            }));
        })
        .await;
    // SRF and ON RRP endpoints stay unmocked and fail soft to empty maps

    let nyfed = NyFedService::new(server.url(""));
    let records = nyfed.fetch_repo_rates(d("2024-05-06"), d("2024-05-07")).await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, d("2024-05-06"));
    assert_eq!(records[0].sofr, Some(5.31));
    assert_eq!(records[0].effr, None);
    assert_eq!(records[1].date, d("2024-05-07"));
    assert_eq!(records[1].sofr, None);
    assert_eq!(records[1].effr, Some(5.33));
}

#[tokio::test]
async fn fred_fetch_skips_missing_value_sentinel() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/series/observations")
                .query_param("series_id", "WALCL")
                .query_param("api_key", "test-key");
            then.status(200).json_body(json!({
                "observations": [
                    { "date": "2024-01-03", "value": "7700.5" },
                    { "date": "2024-01-10", "value": "." },
                    { "date": "2024-01-17", "value": "7690.25" },
                ]
            }));
        })
        .await;

    let fred = FredService::new(Some("test-key".to_string()), server.url(""));
    let values = fred
        .fetch_series("WALCL", d("2024-01-01"), d("2024-01-31"))
        .await
        .unwrap();

    assert_eq!(values.len(), 2);
    assert_eq!(values.get(&d("2024-01-03")), Some(&7700.5));
    assert_eq!(values.get(&d("2024-01-10")), None);
    assert_eq!(values.get(&d("2024-01-17")), Some(&7690.25));
}

#[tokio::test]
async fn fred_missing_api_key_fails_before_any_request() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/series/observations");
            then.status(200).json_body(json!({ "observations": [] }));
        })
        .await;

    let fred = FredService::new(None, server.url(""));
    let err = fred
        .fetch_fed_weekly(d("2024-01-01"), d("2024-01-31"), false)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("FRED_API_KEY"));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn fred_transport_failure_degrades_to_empty_map() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/series/observations");
            then.status(500).body("boom");
        })
        .await;

    let fred = FredService::new(Some("test-key".to_string()), server.url(""));
    let values = fred
        .fetch_series("WRESBAL", d("2024-01-01"), d("2024-01-31"))
        .await
        .unwrap();

    assert!(values.is_empty());
}
