//! FRED (Federal Reserve Economic Data) API client.
//!
//! Weekly Wednesday-level series: WALCL (total assets), WRESBAL (reserve
//! balances) and optionally WTREGEN (Treasury General Account). A missing
//! API key is a configuration precondition and fails before any HTTP request;
//! transport failures fail soft to an empty map like the NY Fed adapter.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::models::{merge_fed_weekly_series, FedWeeklyObservation};

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// Environment variable holding the FRED API key.
pub const API_KEY_VAR: &str = "FRED_API_KEY";

pub const BALANCE_SHEET_SERIES: &str = "WALCL";
pub const RESERVES_SERIES: &str = "WRESBAL";
pub const TGA_SERIES: &str = "WTREGEN";

/// FRED observations mark missing values with this sentinel instead of null.
const MISSING_VALUE_SENTINEL: &str = ".";

#[derive(Debug, thiserror::Error)]
pub enum FredError {
    #[error(
        "FRED API key required: set the {API_KEY_VAR} environment variable \
         (free key at https://fred.stlouisfed.org/docs/api/api_key.html)"
    )]
    MissingApiKey,
}

#[derive(Clone)]
pub struct FredService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: NaiveDate,
    value: String,
}

impl FredService {
    pub fn new(api_key: Option<String>, base_url: String) -> Self {
        let client = Client::builder()
            .user_agent("fed-liquidity-backend/0.1")
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Read the API key from `FRED_API_KEY` if set.
    pub fn from_env(base_url: String) -> Self {
        Self::new(std::env::var(API_KEY_VAR).ok(), base_url)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the weekly series for the range and merge them by date.
    pub async fn fetch_fed_weekly(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        include_tga: bool,
    ) -> Result<Vec<FedWeeklyObservation>, FredError> {
        tracing::info!("Fetching FRED data from {} to {}", start_date, end_date);

        let balance_sheet = self
            .fetch_series(BALANCE_SHEET_SERIES, start_date, end_date)
            .await?;
        let reserves = self
            .fetch_series(RESERVES_SERIES, start_date, end_date)
            .await?;
        let tga = if include_tga {
            Some(self.fetch_series(TGA_SERIES, start_date, end_date).await?)
        } else {
            None
        };

        tracing::info!(
            "FRED series: balance sheet {} | reserves {} records",
            balance_sheet.len(),
            reserves.len()
        );

        Ok(merge_fed_weekly_series(&balance_sheet, &reserves, tga.as_ref()))
    }

    /// Fetch one FRED series as a date → value map.
    ///
    /// Observations carrying the `"."` sentinel are silently dropped.
    pub async fn fetch_series(
        &self,
        series_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, f64>, FredError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(FredError::MissingApiKey);
        };

        match self
            .fetch_observations(api_key, series_id, start_date, end_date)
            .await
        {
            Ok(values) => Ok(values),
            Err(e) => {
                tracing::warn!("Error fetching {}: {}", series_id, e);
                Ok(BTreeMap::new())
            }
        }
    }

    async fn fetch_observations(
        &self,
        api_key: &str,
        series_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, f64>, Box<dyn std::error::Error + Send + Sync>> {
        let url = format!("{}/series/observations", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(&[
                ("series_id", series_id),
                ("api_key", api_key),
                ("file_type", "json"),
                ("observation_start", &start_date.to_string()),
                ("observation_end", &end_date.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("FRED API error {}: {}", status, error_text).into());
        }

        let data: ObservationsResponse = response.json().await?;

        let mut result = BTreeMap::new();
        for obs in data.observations {
            if obs.value == MISSING_VALUE_SENTINEL {
                continue;
            }
            match obs.value.parse::<f64>() {
                Ok(value) => {
                    result.insert(obs.date, value);
                }
                Err(_) => {
                    tracing::warn!(
                        "Skipping unparseable {} observation on {}: {:?}",
                        series_id,
                        obs.date,
                        obs.value
                    );
                }
            }
        }

        Ok(result)
    }
}
