use crate::features::geo::GeoPoint;
use crate::features::stations::models::Station;

/// Closest station to a point together with its distance
#[derive(Debug, Clone)]
pub struct NearestStation {
    pub station: Station,
    pub distance_km: f64,
}

/// Linear scan for the minimum-distance station.
///
/// Returns `None` for an empty slice. On exact ties the first station in
/// slice order wins, so callers should pass stations in a stable order.
pub fn nearest_station(stations: &[Station], point: GeoPoint) -> Option<(&Station, f64)> {
    let mut best: Option<(&Station, f64)> = None;

    for station in stations {
        let distance = point.distance_km(&station.location());
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((station, distance)),
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    // 0.1 degree of latitude is ~11.1 km
    const ORIGIN: GeoPoint = GeoPoint::from_stored(36.8, 10.18);

    fn station(name: &str, lat: f64, lon: f64) -> Station {
        Station {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: format!("{name} street"),
            latitude: lat,
            longitude: lon,
            phone: None,
            email: None,
            manager_user_id: format!("manager-{name}"),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_picks_closest_station() {
        let stations = vec![
            station("s2", 36.89, 10.18),  // ~10 km
            station("s1", 36.8, 10.18),   // 0 km
            station("s3", 36.845, 10.18), // ~5 km
        ];

        let (nearest, distance) = nearest_station(&stations, ORIGIN).unwrap();
        assert_eq!(nearest.name, "s1");
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn test_no_stations_gives_none() {
        assert!(nearest_station(&[], ORIGIN).is_none());
    }

    #[test]
    fn test_exact_tie_keeps_first_encountered() {
        let twins = vec![station("first", 36.9, 10.18), station("second", 36.9, 10.18)];

        let (nearest, _) = nearest_station(&twins, ORIGIN).unwrap();
        assert_eq!(nearest.name, "first");
    }

    #[test]
    fn test_reports_distance_in_km() {
        let stations = vec![station("far", 36.9, 10.18)];
        let (_, distance) = nearest_station(&stations, ORIGIN).unwrap();
        assert!((distance - 11.12).abs() < 0.05, "got {distance}");
    }
}
