//! Built-in reference data: the aircraft-model catalog and the airports
//! known to the geography lookup. Seeded into the database at init.

use crate::{Aircraft, AircraftCategory, AircraftModel, AircraftStatus, Airport};
use rust_decimal::Decimal;

/// Model code of the one-time gift aircraft granted at game start.
pub const STARTER_MODEL_CODE: &str = "DC3FREE";

#[allow(clippy::too_many_arguments)]
fn model(
    code: &str,
    manufacturer: &str,
    name: &str,
    price: i64,
    cargo_kg: i64,
    range_km: f64,
    speed_kts: f64,
    category: AircraftCategory,
    eco_base: f64,
    eco_class: &str,
) -> AircraftModel {
    AircraftModel {
        model_code: code.to_string(),
        manufacturer: manufacturer.to_string(),
        model_name: name.to_string(),
        purchase_price: Decimal::new(price, 0),
        base_cargo_kg: cargo_kg,
        range_km,
        cruise_speed_kts: speed_kts,
        category,
        eco_fee_multiplier: eco_base,
        eco_class: eco_class.to_string(),
    }
}

/// The stock aircraft catalog, STARTER through HUGE.
pub fn default_models() -> Vec<AircraftModel> {
    use AircraftCategory::*;
    vec![
        model(STARTER_MODEL_CODE, "Douglas", "DC-3", 0, 1_500, 2_400.0, 180.0, Starter, -0.15, "E"),
        model("C208F", "Cessna", "208B Grand Caravan", 1_300_000, 1_200, 1_680.0, 175.0, Small, 0.05, "B"),
        model("PC12F", "Pilatus", "PC-12 Cargo", 2_200_000, 1_400, 2_800.0, 270.0, Small, 0.10, "A"),
        model("AT72F", "ATR", "72-600F", 9_500_000, 8_800, 1_500.0, 275.0, Medium, 0.00, "B"),
        model("B737F", "Boeing", "737-800BCF", 32_000_000, 21_000, 3_700.0, 430.0, Medium, 0.08, "C"),
        model("A332F", "Airbus", "A330-200F", 95_000_000, 65_000, 7_400.0, 470.0, Large, 0.12, "C"),
        model("B763F", "Boeing", "767-300F", 110_000_000, 52_000, 6_000.0, 460.0, Large, -0.05, "D"),
        model("B748F", "Boeing", "747-8F", 180_000_000, 134_000, 8_100.0, 490.0, Huge, 0.20, "D"),
        model("A124F", "Antonov", "An-124 Ruslan", 220_000_000, 150_000, 4_800.0, 450.0, Huge, -0.10, "E"),
    ]
}

fn airport(ident: &str, name: &str, lat: f64, lon: f64) -> Airport {
    Airport {
        ident: ident.to_string(),
        name: Some(name.to_string()),
        airport_type: "large_airport".to_string(),
        latitude_deg: Some(lat),
        longitude_deg: Some(lon),
    }
}

/// Reference airports with coordinates, spanning short and long hauls
/// from each starting base.
pub fn reference_airports() -> Vec<Airport> {
    vec![
        airport("EFHK", "Helsinki-Vantaa", 60.3172, 24.9633),
        airport("ESSA", "Stockholm Arlanda", 59.6519, 17.9186),
        airport("ENGM", "Oslo Gardermoen", 60.1939, 11.1004),
        airport("EKCH", "Copenhagen Kastrup", 55.6179, 12.6560),
        airport("EETN", "Tallinn Lennart Meri", 59.4133, 24.8328),
        airport("EGLL", "London Heathrow", 51.4706, -0.4619),
        airport("LFPG", "Paris Charles de Gaulle", 49.0128, 2.5500),
        airport("EDDF", "Frankfurt am Main", 50.0333, 8.5706),
        airport("EHAM", "Amsterdam Schiphol", 52.3086, 4.7639),
        airport("LSZH", "Zurich", 47.4647, 8.5492),
        airport("LEMD", "Madrid Barajas", 40.4719, -3.5626),
        airport("LIRF", "Rome Fiumicino", 41.8003, 12.2389),
        airport("LTFM", "Istanbul", 41.2753, 28.7519),
        airport("KJFK", "New York JFK", 40.6398, -73.7789),
        airport("KORD", "Chicago O'Hare", 41.9786, -87.9048),
        airport("KLAX", "Los Angeles Intl", 33.9425, -118.4081),
        airport("KMIA", "Miami Intl", 25.7932, -80.2906),
        airport("CYYZ", "Toronto Pearson", 43.6772, -79.6306),
        airport("SBGR", "Sao Paulo Guarulhos", -23.4356, -46.4731),
        airport("OMDB", "Dubai Intl", 25.2528, 55.3644),
        airport("VHHH", "Hong Kong Intl", 22.3089, 113.9146),
        airport("WSSS", "Singapore Changi", 1.3502, 103.9944),
        airport("RJTT", "Tokyo Haneda", 35.5523, 139.7798),
        airport("ZBAA", "Beijing Capital", 40.0801, 116.5846),
        airport("YSSY", "Sydney Kingsford Smith", -33.9461, 151.1772),
        airport("FAOR", "Johannesburg O. R. Tambo", -26.1392, 28.2460),
    ]
}

/// Build the gift STARTER aircraft for a new save. The caller supplies the
/// registration; identifiers are assigned by the persistence layer.
pub fn gift_aircraft(save_id: i64, day: i64, base_ident: &str, base_id: i64, registration: &str) -> Aircraft {
    Aircraft {
        aircraft_id: 0,
        save_id,
        model_code: STARTER_MODEL_CODE.to_string(),
        registration: registration.to_string(),
        nickname: Some("Grandfather's DC-3".to_string()),
        current_airport_ident: base_ident.to_string(),
        acquired_day: day,
        purchase_price: Decimal::ZERO,
        condition_percent: 100,
        status: AircraftStatus::Idle,
        hours_flown: 0.0,
        sold_day: None,
        sale_price: None,
        base_id: Some(base_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_exactly_one_starter() {
        let models = default_models();
        let starters: Vec<_> = models
            .iter()
            .filter(|m| m.category == AircraftCategory::Starter)
            .collect();
        assert_eq!(starters.len(), 1);
        assert_eq!(starters[0].model_code, STARTER_MODEL_CODE);
        assert_eq!(starters[0].purchase_price, Decimal::ZERO);
    }

    #[test]
    fn catalog_codes_are_unique() {
        let models = default_models();
        let mut codes: Vec<_> = models.iter().map(|m| m.model_code.clone()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), models.len());
    }

    #[test]
    fn every_category_is_represented() {
        let models = default_models();
        for cat in [
            AircraftCategory::Small,
            AircraftCategory::Medium,
            AircraftCategory::Large,
            AircraftCategory::Huge,
        ] {
            assert!(models.iter().any(|m| m.category == cat), "missing {cat}");
        }
    }

    #[test]
    fn reference_airports_have_coords_and_unique_idents() {
        let airports = reference_airports();
        assert!(airports.len() >= 20);
        let mut idents: Vec<_> = airports.iter().map(|a| a.ident.clone()).collect();
        idents.sort();
        idents.dedup();
        assert_eq!(idents.len(), airports.len());
        assert!(airports.iter().all(|a| a.coords().is_some()));
    }

    #[test]
    fn starting_base_idents_exist_in_reference_set() {
        let airports = reference_airports();
        for ident in ["EFHK", "LFPG", "KJFK"] {
            assert!(airports.iter().any(|a| a.ident == ident));
        }
    }
}
