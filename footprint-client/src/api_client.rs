//! HTTP client for footprint-server

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use footprint_common::config::ClientSection;
use footprint_common::{Couple, CoupleCode, Location, NewLocation};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

const USER_AGENT: &str = concat!("footprint-client/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Operations the client needs from the backend
#[async_trait]
pub trait FootprintApi: Send + Sync {
    async fn create_couple(&self, anniversary: Option<NaiveDate>)
        -> Result<CoupleCode, ClientError>;

    async fn get_couple(&self, code: &CoupleCode) -> Result<Couple, ClientError>;

    /// Validate a code typed by the partner
    async fn join_couple(&self, code: &str) -> Result<Couple, ClientError>;

    async fn list_locations(&self, code: &CoupleCode) -> Result<Vec<Location>, ClientError>;

    async fn create_location(&self, request: &NewLocation) -> Result<Location, ClientError>;

    /// Rows removed; 0 when id and code did not match
    async fn delete_location(&self, id: i64, code: &CoupleCode) -> Result<u64, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCoupleBody {
    couple_code: CoupleCode,
}

#[derive(Deserialize)]
struct CoupleBody {
    couple: Couple,
}

#[derive(Deserialize)]
struct ListBody {
    restaurants: Vec<Location>,
}

#[derive(Deserialize)]
struct CreateBody {
    restaurant: Location,
}

#[derive(Deserialize)]
struct DeleteBody {
    #[serde(default)]
    deleted: u64,
}

pub struct FootprintClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl FootprintClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client from the `[client]` config table
    pub fn from_config(section: &ClientSection) -> Result<Self, ClientError> {
        let base_url = section.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let timeout = section.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::with_timeout(base_url, Duration::from_secs(timeout))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ClientError::Parse(e.to_string()));
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };

        if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(message))
        } else {
            Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn network(e: reqwest::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

#[async_trait]
impl FootprintApi for FootprintClient {
    async fn create_couple(
        &self,
        anniversary: Option<NaiveDate>,
    ) -> Result<CoupleCode, ClientError> {
        let body = json!({
            "anniversaryDate": anniversary.map(|d| d.to_string()).unwrap_or_default(),
        });

        let response = self
            .http_client
            .post(self.url("/api/couple/create"))
            .json(&body)
            .send()
            .await
            .map_err(network)?;

        let created: CreateCoupleBody = Self::read(response).await?;
        info!("Created couple code {}", created.couple_code);
        Ok(created.couple_code)
    }

    async fn get_couple(&self, code: &CoupleCode) -> Result<Couple, ClientError> {
        let response = self
            .http_client
            .get(self.url(&format!("/api/couple/{}", code)))
            .send()
            .await
            .map_err(network)?;

        let body: CoupleBody = Self::read(response).await?;
        Ok(body.couple)
    }

    async fn join_couple(&self, code: &str) -> Result<Couple, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/couple/join"))
            .json(&json!({ "coupleCode": code }))
            .send()
            .await
            .map_err(network)?;

        let body: CoupleBody = Self::read(response).await?;
        Ok(body.couple)
    }

    async fn list_locations(&self, code: &CoupleCode) -> Result<Vec<Location>, ClientError> {
        let response = self
            .http_client
            .get(self.url(&format!("/api/restaurants/{}", code)))
            .send()
            .await
            .map_err(network)?;

        let body: ListBody = Self::read(response).await?;
        debug!("Fetched {} locations for {}", body.restaurants.len(), code);
        Ok(body.restaurants)
    }

    async fn create_location(&self, request: &NewLocation) -> Result<Location, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/restaurants"))
            .json(request)
            .send()
            .await
            .map_err(network)?;

        let body: CreateBody = Self::read(response).await?;
        Ok(body.restaurant)
    }

    async fn delete_location(&self, id: i64, code: &CoupleCode) -> Result<u64, ClientError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/api/restaurants/{}", id)))
            .json(&json!({ "coupleCode": code }))
            .send()
            .await
            .map_err(network)?;

        let body: DeleteBody = Self::read(response).await?;
        Ok(body.deleted)
    }
}
