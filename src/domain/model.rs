use serde::{Deserialize, Serialize};

/// Raw locality fields of one shipment row. Every field has already been
/// normalized: blank and null-like spreadsheet values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub mexico_origin_city_state: Option<String>,
    pub mexico_dest_city_state: Option<String>,
    pub origin_city: Option<String>,
    pub origin_state: Option<String>,
    pub origin_zip: Option<String>,
    pub dest_city: Option<String>,
    pub dest_state: Option<String>,
    pub dest_zip: Option<String>,
}

/// Origin and destination addresses bounding the Mexico leg of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPair {
    pub origin: String,
    pub destination: String,
}

/// Which of the four routing rules a record falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingRule {
    /// Mexico origin, U.S. destination.
    MexicoToUs,
    /// U.S. origin, Mexico destination.
    UsToMexico,
    /// Both ends in Mexico.
    WithinMexico,
    /// Neither end in Mexico.
    NoMexicoLeg,
}

/// Final state of one record after enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MileageOutcome {
    /// No Mexico leg could be derived, so no lookup was made.
    NoLeg,
    /// A leg existed but the provider gave no usable distance.
    LookupFailed,
    Distance(f64),
}

impl MileageOutcome {
    /// Collapses the outcome to the plain miles-or-absent view.
    pub fn miles(&self) -> Option<f64> {
        match self {
            MileageOutcome::Distance(miles) => Some(*miles),
            MileageOutcome::NoLeg | MileageOutcome::LookupFailed => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            MileageOutcome::NoLeg => "no_leg",
            MileageOutcome::LookupFailed => "lookup_failed",
            MileageOutcome::Distance(_) => "distance",
        }
    }
}

/// A sheet held in memory: header names plus rows, both in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub total: usize,
    pub with_leg: usize,
    pub resolved: usize,
    pub failed: usize,
}

impl EnrichmentSummary {
    pub fn from_outcomes(outcomes: &[MileageOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                MileageOutcome::NoLeg => {}
                MileageOutcome::LookupFailed => {
                    summary.with_leg += 1;
                    summary.failed += 1;
                }
                MileageOutcome::Distance(_) => {
                    summary.with_leg += 1;
                    summary.resolved += 1;
                }
            }
        }
        summary
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub dataset: Dataset,
    pub outcomes: Vec<MileageOutcome>,
    pub summary: EnrichmentSummary,
}
