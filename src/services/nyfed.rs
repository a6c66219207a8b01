//! NY Fed Markets API client.
//!
//! Four daily series are consumed: SOFR and EFFR (reference rates), SRF and
//! ON RRP (operation results). Each fetch fails soft: a transport or parse
//! failure logs a warning and yields an empty map so a partial run can still
//! make progress with the remaining series.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::models::{merge_repo_series, RepoRateObservation};

pub const DEFAULT_BASE_URL: &str = "https://markets.newyorkfed.org/api";

const SOFR_PATH: &str = "/rates/secured/sofr/search.json";
const EFFR_PATH: &str = "/rates/unsecured/effr/search.json";
const SRF_PATH: &str = "/srf/all/search.json";
const ONRRP_PATH: &str = "/rp/reverserepo/propositions/search.json";

#[derive(Clone)]
pub struct NyFedService {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RefRatesResponse {
    #[serde(rename = "refRates", default)]
    ref_rates: Vec<RefRate>,
}

#[derive(Debug, Deserialize)]
struct RefRate {
    #[serde(rename = "effectiveDate")]
    effective_date: NaiveDate,
    #[serde(rename = "percentRate")]
    percent_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SrfResponse {
    #[serde(default)]
    srf: OperationsEnvelope,
}

#[derive(Debug, Deserialize)]
struct OnRrpResponse {
    #[serde(default)]
    repo: OperationsEnvelope,
}

#[derive(Debug, Default, Deserialize)]
struct OperationsEnvelope {
    #[serde(default)]
    operations: Vec<Operation>,
}

#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(rename = "opDate")]
    op_date: Option<NaiveDate>,
    #[serde(rename = "operationDate")]
    operation_date: Option<NaiveDate>,
    #[serde(rename = "totalAmtAccepted")]
    total_amt_accepted: Option<f64>,
}

impl NyFedService {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .user_agent("fed-liquidity-backend/0.1")
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, base_url }
    }

    /// Fetch all four daily series for the range and merge them by date.
    pub async fn fetch_repo_rates(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<RepoRateObservation> {
        tracing::info!("Fetching NY Fed data from {} to {}", start_date, end_date);

        let sofr = self.fetch_sofr(start_date, end_date).await;
        let effr = self.fetch_effr(start_date, end_date).await;
        let srf = self.fetch_srf(start_date, end_date).await;
        let onrrp = self.fetch_onrrp(start_date, end_date).await;

        tracing::info!(
            "NY Fed series: SOFR {} | EFFR {} | SRF {} | ON RRP {} records",
            sofr.len(),
            effr.len(),
            srf.len(),
            onrrp.len()
        );

        merge_repo_series(&sofr, &effr, &srf, &onrrp)
    }

    /// SOFR rates (percent) by date.
    pub async fn fetch_sofr(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BTreeMap<NaiveDate, f64> {
        match self.fetch_ref_rates(SOFR_PATH, start_date, end_date).await {
            Ok(rates) => rates,
            Err(e) => {
                tracing::warn!("Error fetching SOFR: {}", e);
                BTreeMap::new()
            }
        }
    }

    /// EFFR rates (percent) by date.
    pub async fn fetch_effr(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BTreeMap<NaiveDate, f64> {
        match self.fetch_ref_rates(EFFR_PATH, start_date, end_date).await {
            Ok(rates) => rates,
            Err(e) => {
                tracing::warn!("Error fetching EFFR: {}", e);
                BTreeMap::new()
            }
        }
    }

    /// SRF usage by date, normalized from millions to billions.
    ///
    /// The facility started in July 2021; earlier ranges come back empty.
    pub async fn fetch_srf(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BTreeMap<NaiveDate, f64> {
        let result: Result<SrfResponse, _> = self.get_json(SRF_PATH, start_date, end_date).await;

        match result {
            Ok(data) => data
                .srf
                .operations
                .into_iter()
                .filter_map(|op| {
                    let date = op.op_date?;
                    let amount = op.total_amt_accepted?;
                    Some((date, amount / 1_000.0))
                })
                .collect(),
            Err(e) => {
                tracing::warn!("Error fetching SRF: {}", e);
                BTreeMap::new()
            }
        }
    }

    /// ON RRP usage by date, normalized from dollars to billions.
    pub async fn fetch_onrrp(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BTreeMap<NaiveDate, f64> {
        let result: Result<OnRrpResponse, _> =
            self.get_json(ONRRP_PATH, start_date, end_date).await;

        match result {
            Ok(data) => data
                .repo
                .operations
                .into_iter()
                .filter_map(|op| {
                    let date = op.operation_date?;
                    let amount = op.total_amt_accepted?;
                    Some((date, amount / 1_000_000_000.0))
                })
                .collect(),
            Err(e) => {
                tracing::warn!("Error fetching ON RRP: {}", e);
                BTreeMap::new()
            }
        }
    }

    async fn fetch_ref_rates(
        &self,
        path: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, f64>, Box<dyn std::error::Error + Send + Sync>> {
        let data: RefRatesResponse = self.get_json(path, start_date, end_date).await?;

        Ok(data
            .ref_rates
            .into_iter()
            .filter_map(|r| Some((r.effective_date, r.percent_rate?)))
            .collect())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(&[
                ("startDate", start_date.to_string()),
                ("endDate", end_date.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("NY Fed API error {}: {}", status, error_text).into());
        }

        Ok(response.json().await?)
    }
}
