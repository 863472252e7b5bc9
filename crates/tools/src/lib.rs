//! Lookup tools surfaced through the API: a static city directory,
//! local-time computation, and a weather client.

pub mod cities;
mod time;
mod weather;

pub use cities::City;
pub use time::{local_time, LocalTime};
pub use weather::{Weather, WeatherClient};
