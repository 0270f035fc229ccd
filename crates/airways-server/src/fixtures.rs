//! Seed airport reference data.

use airways_core::models::Airport;

/// Airports seeded into a fresh database. Corridors can only be tracked
/// between airports present here or inserted later.
pub fn seed_airports() -> Vec<Airport> {
    vec![
        Airport::new(
            "SBBR",
            "Brasília International Airport",
            -15.869,
            -47.918,
        )
        .with_altitude_m(1_066.0),
        Airport::new(
            "SBGR",
            "São Paulo-Guarulhos International Airport",
            -23.426,
            -46.468,
        )
        .with_altitude_m(750.0),
        Airport::new("SBRJ", "Santos Dumont Airport", -22.906, -43.158).with_altitude_m(3.0),
        Airport::new("SBSP", "São Paulo-Congonhas Airport", -23.623, -46.652)
            .with_altitude_m(802.0),
    ]
}
