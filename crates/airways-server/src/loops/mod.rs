//! Background loops.

pub mod detect_loop;
pub mod track_loop;
pub mod weather_loop;
