//! HTTP clients for the external data feeds.

pub mod opensky;
pub mod radar;

pub use opensky::{FlightStateClient, StateVector, DEFAULT_STATES_URL};
pub use radar::{ConvectionRadar, DEFAULT_REFRESH_INTERVAL};
