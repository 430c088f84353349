//! Google Routes API client used for Mexico leg distances.

use crate::domain::model::AddressPair;
use crate::domain::ports::{DistanceProvider, RoutesConfig};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROUTES_ENDPOINT: &str =
    "https://routes.googleapis.com/directions/v2:computeRoutes";

const METERS_TO_MILES: f64 = 0.000621371;
const FIELD_MASK: &str = "routes.distanceMeters";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest<'a> {
    origin: Waypoint<'a>,
    destination: Waypoint<'a>,
    travel_mode: &'static str,
    routing_preference: &'static str,
}

#[derive(Debug, Serialize)]
struct Waypoint<'a> {
    address: &'a str,
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Route {
    distance_meters: Option<f64>,
}

/// Converts meters to miles, rounded to one decimal place.
pub fn meters_to_miles(meters: f64) -> f64 {
    (meters * METERS_TO_MILES * 10.0).round() / 10.0
}

pub struct RoutesClient {
    client: Client,
    config: RoutesConfig,
}

impl RoutesClient {
    pub fn new(config: RoutesConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        if config.api_key.is_none() {
            tracing::warn!("⚠️ Routes API key not configured, every Mexico leg will have no distance");
        }

        Ok(Self { client, config })
    }

    async fn compute_route(&self, api_key: &str, pair: &AddressPair) -> Option<f64> {
        let payload = ComputeRoutesRequest {
            origin: Waypoint {
                address: &pair.origin,
            },
            destination: Waypoint {
                address: &pair.destination,
            },
            travel_mode: "DRIVE",
            routing_preference: "TRAFFIC_AWARE_OPTIMAL",
        };

        let response = match self
            .client
            .post(&self.config.endpoint)
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    origin = %pair.origin,
                    destination = %pair.destination,
                    "Routes API request failed: {}",
                    e
                );
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            tracing::warn!("Routes API error: {} {}", status, snippet);
            return None;
        }

        let body: ComputeRoutesResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Routes API returned an unreadable body: {}", e);
                return None;
            }
        };

        let meters = body.routes.first()?.distance_meters?;
        Some(meters_to_miles(meters))
    }
}

#[async_trait]
impl DistanceProvider for RoutesClient {
    async fn distance_miles(&self, pair: &AddressPair) -> Option<f64> {
        let api_key = self.config.api_key.as_deref()?;
        tracing::debug!("Routing {} -> {}", pair.origin, pair.destination);
        self.compute_route(api_key, pair).await
    }
}
