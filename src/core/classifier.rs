use crate::core::address::{build_mexico_address, build_us_address};
use crate::domain::model::{AddressPair, RoutingRule, ShipmentRecord};

/// Picks the routing rule from the presence of the two Mexico columns.
pub fn classify_rule(record: &ShipmentRecord) -> RoutingRule {
    let has_mexico_origin = is_present(&record.mexico_origin_city_state);
    let has_mexico_dest = is_present(&record.mexico_dest_city_state);

    match (has_mexico_origin, has_mexico_dest) {
        (true, false) => RoutingRule::MexicoToUs,
        (false, true) => RoutingRule::UsToMexico,
        (true, true) => RoutingRule::WithinMexico,
        (false, false) => RoutingRule::NoMexicoLeg,
    }
}

/// Derives the addresses bounding the Mexico leg, or `None` when the record has
/// no such leg or its U.S. side lacks a city or state. A present Mexico token
/// always produces an address, so rule 3 never comes back empty.
pub fn build_leg(record: &ShipmentRecord) -> Option<AddressPair> {
    let (origin, destination) = match classify_rule(record) {
        RoutingRule::MexicoToUs => (
            build_mexico_address(record.mexico_origin_city_state.as_deref(), None)?,
            build_us_address(
                record.dest_city.as_deref(),
                record.dest_state.as_deref(),
                record.dest_zip.as_deref(),
            )?,
        ),
        RoutingRule::UsToMexico => (
            build_us_address(
                record.origin_city.as_deref(),
                record.origin_state.as_deref(),
                record.origin_zip.as_deref(),
            )?,
            build_mexico_address(record.mexico_dest_city_state.as_deref(), None)?,
        ),
        RoutingRule::WithinMexico => (
            build_mexico_address(record.mexico_origin_city_state.as_deref(), None)?,
            build_mexico_address(record.mexico_dest_city_state.as_deref(), None)?,
        ),
        RoutingRule::NoMexicoLeg => return None,
    };

    Some(AddressPair {
        origin,
        destination,
    })
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
