//! Local time lookup

use chrono::{FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use vox_core::{Error, Result};

use crate::cities;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalTime {
    pub city: String,
    pub country: String,
    /// RFC 3339 timestamp in the city's offset
    pub local_time: String,
    pub utc_offset: String,
}

/// Current wall-clock time in a known city.
pub fn local_time(city_name: &str) -> Result<LocalTime> {
    let city = cities::find(city_name)
        .ok_or_else(|| Error::NotFound(format!("unknown city '{city_name}'")))?;
    // Offsets in the directory are bounded, construction cannot fail.
    let offset = FixedOffset::east_opt(city.utc_offset_minutes * 60)
        .ok_or_else(|| Error::Internal("city offset out of range".to_string()))?;
    let now = Utc::now().with_timezone(&offset);
    Ok(LocalTime {
        city: city.name.to_string(),
        country: city.country.to_string(),
        local_time: now.to_rfc3339(),
        utc_offset: offset.to_string(),
    })
}
