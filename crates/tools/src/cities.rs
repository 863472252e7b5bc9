//! Static city directory
//!
//! A small built-in gazetteer; enough for the lookup tools without a
//! geocoding dependency. Offsets are standard time, no DST handling.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub name: &'static str,
    pub country: &'static str,
    /// UTC offset in whole minutes (standard time)
    pub utc_offset_minutes: i32,
    pub latitude: f64,
    pub longitude: f64,
}

pub const CITIES: &[City] = &[
    City { name: "london", country: "United Kingdom", utc_offset_minutes: 0, latitude: 51.5074, longitude: -0.1278 },
    City { name: "paris", country: "France", utc_offset_minutes: 60, latitude: 48.8566, longitude: 2.3522 },
    City { name: "berlin", country: "Germany", utc_offset_minutes: 60, latitude: 52.5200, longitude: 13.4050 },
    City { name: "new york", country: "United States", utc_offset_minutes: -300, latitude: 40.7128, longitude: -74.0060 },
    City { name: "san francisco", country: "United States", utc_offset_minutes: -480, latitude: 37.7749, longitude: -122.4194 },
    City { name: "tokyo", country: "Japan", utc_offset_minutes: 540, latitude: 35.6762, longitude: 139.6503 },
    City { name: "sydney", country: "Australia", utc_offset_minutes: 600, latitude: -33.8688, longitude: 151.2093 },
    City { name: "mumbai", country: "India", utc_offset_minutes: 330, latitude: 19.0760, longitude: 72.8777 },
    City { name: "delhi", country: "India", utc_offset_minutes: 330, latitude: 28.7041, longitude: 77.1025 },
    City { name: "bengaluru", country: "India", utc_offset_minutes: 330, latitude: 12.9716, longitude: 77.5946 },
    City { name: "singapore", country: "Singapore", utc_offset_minutes: 480, latitude: 1.3521, longitude: 103.8198 },
    City { name: "dubai", country: "United Arab Emirates", utc_offset_minutes: 240, latitude: 25.2048, longitude: 55.2708 },
    City { name: "sao paulo", country: "Brazil", utc_offset_minutes: -180, latitude: -23.5505, longitude: -46.6333 },
    City { name: "toronto", country: "Canada", utc_offset_minutes: -300, latitude: 43.6532, longitude: -79.3832 },
    City { name: "cairo", country: "Egypt", utc_offset_minutes: 120, latitude: 30.0444, longitude: 31.2357 },
];

/// Case-insensitive lookup by name.
pub fn find(name: &str) -> Option<&'static City> {
    let needle = name.trim().to_lowercase();
    CITIES.iter().find(|c| c.name == needle)
}

/// Names of every known city.
pub fn names() -> Vec<&'static str> {
    CITIES.iter().map(|c| c.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(find("Tokyo").is_some());
        assert!(find("  LONDON ").is_some());
        assert!(find("atlantis").is_none());
    }

    #[test]
    fn test_directory_has_no_duplicates() {
        let mut names = names();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }
}
