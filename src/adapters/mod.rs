// Adapters layer: concrete implementations for external systems.

pub mod routes;

pub use routes::{meters_to_miles, RoutesClient, DEFAULT_ROUTES_ENDPOINT};
