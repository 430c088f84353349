//! Bounded fan-out of distance lookups with order-preserving reassembly.
//!
//! Every lookup task carries the index of the record it was scheduled for and
//! its result is written back through that index only. Completion order never
//! matters.

use crate::core::classifier::build_leg;
use crate::domain::model::{MileageOutcome, ShipmentRecord};
use crate::domain::ports::DistanceProvider;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default cap on simultaneously in-flight lookups.
pub const DEFAULT_CONCURRENCY: usize = 20;

pub struct MileageEnricher {
    provider: Arc<dyn DistanceProvider>,
    concurrency: usize,
}

impl MileageEnricher {
    pub fn new(provider: Arc<dyn DistanceProvider>, concurrency: usize) -> Self {
        Self {
            provider,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Classifies every record and looks up distances for those with a Mexico
    /// leg. The result has one outcome per record, in input order.
    pub async fn enrich(&self, records: &[ShipmentRecord]) -> Vec<MileageOutcome> {
        let limiter = Arc::new(Semaphore::new(self.concurrency));
        let mut outcomes = vec![MileageOutcome::NoLeg; records.len()];
        let mut lookups = JoinSet::new();

        for (index, record) in records.iter().enumerate() {
            let Some(pair) = build_leg(record) else {
                continue;
            };

            // Stays LookupFailed unless the tagged task reports a distance.
            outcomes[index] = MileageOutcome::LookupFailed;

            let provider = Arc::clone(&self.provider);
            let limiter = Arc::clone(&limiter);
            lookups.spawn(async move {
                // The permit is held for the duration of the call and dropped on every exit.
                let miles = match limiter.acquire_owned().await {
                    Ok(_permit) => provider.distance_miles(&pair).await,
                    Err(_) => None,
                };
                (index, miles)
            });
        }

        tracing::debug!(
            "Scheduled {} distance lookups for {} records (concurrency {})",
            lookups.len(),
            records.len(),
            self.concurrency
        );

        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((index, Some(miles))) => outcomes[index] = MileageOutcome::Distance(miles),
                Ok((index, None)) => {
                    tracing::debug!("No distance available for row {}", index);
                }
                Err(e) => {
                    tracing::warn!("Distance lookup task aborted: {}", e);
                }
            }
        }

        outcomes
    }
}

/// Miles-or-absent per record, in input order.
pub async fn compute_mexico_miles(
    records: &[ShipmentRecord],
    provider: Arc<dyn DistanceProvider>,
    concurrency: usize,
) -> Vec<Option<f64>> {
    MileageEnricher::new(provider, concurrency)
        .enrich(records)
        .await
        .iter()
        .map(MileageOutcome::miles)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AddressPair;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Stub provider: miles derived from the origin string, latency chosen per
    /// origin, in-flight calls instrumented.
    #[derive(Default)]
    struct StubProvider {
        delays_ms: HashMap<String, u64>,
        failing_origins: Vec<String>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: Mutex<Vec<AddressPair>>,
    }

    impl StubProvider {
        fn miles_for(origin: &str) -> f64 {
            origin.len() as f64 + 0.5
        }

        fn calls(&self) -> Vec<AddressPair> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DistanceProvider for StubProvider {
        async fn distance_miles(&self, pair: &AddressPair) -> Option<f64> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().unwrap().push(pair.clone());

            let delay = self.delays_ms.get(&pair.origin).copied().unwrap_or(1);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.failing_origins.contains(&pair.origin) {
                return None;
            }
            Some(Self::miles_for(&pair.origin))
        }
    }

    fn within_mexico(origin_city: &str) -> ShipmentRecord {
        ShipmentRecord {
            mexico_origin_city_state: Some(format!("{},NL", origin_city)),
            mexico_dest_city_state: Some("SALTILLO,CO".to_string()),
            ..ShipmentRecord::default()
        }
    }

    #[tokio::test]
    async fn test_two_record_scenario() {
        let records = vec![
            ShipmentRecord {
                mexico_origin_city_state: Some("TIJUANA,BC".to_string()),
                dest_city: Some("San Diego".to_string()),
                dest_state: Some("CA".to_string()),
                dest_zip: Some("92101".to_string()),
                ..ShipmentRecord::default()
            },
            ShipmentRecord {
                origin_city: Some("Dallas".to_string()),
                origin_state: Some("TX".to_string()),
                ..ShipmentRecord::default()
            },
        ];
        let provider = Arc::new(StubProvider::default());

        let miles = compute_mexico_miles(&records, provider.clone(), DEFAULT_CONCURRENCY).await;

        assert_eq!(
            miles,
            vec![Some(StubProvider::miles_for("TIJUANA, BC, Mexico")), None]
        );
        assert_eq!(
            provider.calls(),
            vec![AddressPair {
                origin: "TIJUANA, BC, Mexico".to_string(),
                destination: "San Diego, CA, 92101, USA".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_output_order_survives_reversed_completion() {
        let cities: Vec<String> = (0..30).map(|i| format!("CITY{:02}", i)).collect();
        let records: Vec<ShipmentRecord> = cities.iter().map(|c| within_mexico(c)).collect();

        // Earlier rows sleep longer so they finish last.
        let delays_ms = cities
            .iter()
            .enumerate()
            .map(|(i, c)| (format!("{}, NL, Mexico", c), (30 - i as u64) * 3))
            .collect();
        let provider = Arc::new(StubProvider {
            delays_ms,
            ..StubProvider::default()
        });

        let outcomes = MileageEnricher::new(provider, 8).enrich(&records).await;

        assert_eq!(outcomes.len(), records.len());
        for (i, city) in cities.iter().enumerate() {
            let origin = format!("{}, NL, Mexico", city);
            assert_eq!(
                outcomes[i],
                MileageOutcome::Distance(StubProvider::miles_for(&origin))
            );
        }
    }

    #[tokio::test]
    async fn test_concurrency_bound_is_respected() {
        let records: Vec<ShipmentRecord> =
            (0..100).map(|i| within_mexico(&format!("C{}", i))).collect();
        let delays_ms = (0..100)
            .map(|i| (format!("C{}, NL, Mexico", i), 5 + (i % 7) as u64))
            .collect();
        let provider = Arc::new(StubProvider {
            delays_ms,
            ..StubProvider::default()
        });

        let outcomes = MileageEnricher::new(provider.clone(), 20)
            .enrich(&records)
            .await;

        assert_eq!(outcomes.len(), 100);
        assert!(outcomes.iter().all(|o| o.miles().is_some()));
        assert_eq!(provider.calls().len(), 100);
        let max = provider.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 20, "saw {} lookups in flight", max);
        assert_eq!(provider.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_lookup_only_affects_its_row() {
        let records = vec![
            within_mexico("MONTERREY"),
            within_mexico("APODACA"),
            ShipmentRecord::default(),
        ];
        let provider = Arc::new(StubProvider {
            failing_origins: vec!["APODACA, NL, Mexico".to_string()],
            ..StubProvider::default()
        });

        let outcomes = MileageEnricher::new(provider, 2).enrich(&records).await;

        assert_eq!(
            outcomes,
            vec![
                MileageOutcome::Distance(StubProvider::miles_for("MONTERREY, NL, Mexico")),
                MileageOutcome::LookupFailed,
                MileageOutcome::NoLeg,
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_us_side_makes_no_call() {
        let records = vec![ShipmentRecord {
            mexico_dest_city_state: Some("MONTERREY,NL".to_string()),
            origin_city: Some("Laredo".to_string()),
            ..ShipmentRecord::default()
        }];
        let provider = Arc::new(StubProvider::default());

        let outcomes = MileageEnricher::new(provider.clone(), 20)
            .enrich(&records)
            .await;

        assert_eq!(outcomes, vec![MileageOutcome::NoLeg]);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let records: Vec<ShipmentRecord> = ["JUAREZ", "REYNOSA", "NOGALES"]
            .iter()
            .map(|c| within_mexico(c))
            .chain(std::iter::once(ShipmentRecord::default()))
            .collect();
        let provider = Arc::new(StubProvider::default());

        let first = compute_mexico_miles(&records, provider.clone(), 2).await;
        let second = compute_mexico_miles(&records, provider, 2).await;

        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        assert_eq!(first[3], None);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let provider = Arc::new(StubProvider::default());
        let outcomes = MileageEnricher::new(provider, 20).enrich(&[]).await;
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_zero_concurrency_is_raised_to_one() {
        let provider = Arc::new(StubProvider::default());
        assert_eq!(MileageEnricher::new(provider, 0).concurrency(), 1);
    }
}
