//! Reads quotes saved by the old back office, which appended a JSON blob to
//! the free-text notes field after a marker line.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DisplayFromStr, PickFirst, VecSkipError};

use crate::config::LEGACY_AED_PER_USD;
use crate::models::{
    pax::PaxComposition,
    quote::{HotelChoice, TourSelection, TourType},
};

pub const NOTES_MARKER: &str = "---QUOTE_DATA---";

// Old form data stored numbers as numbers, numeric strings or "" for empty.
// Each field degrades on its own so one bad value never drops the payload.

#[serde_as]
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LegacyPayload {
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    hotel_options: Vec<LegacyHotel>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    selected_hotel: Option<LegacyHotel>,
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    tours: Vec<LegacyTour>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pax: Option<PaxComposition>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    exchange_rate: Option<f64>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyHotel {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde_as(as = "DefaultOnError<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    rate: f64,
    #[serde_as(as = "DefaultOnError<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    extra_bed_rate: f64,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTour {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde_as(as = "DefaultOnError<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    cost_per_person: f64,
    #[serde_as(as = "DefaultOnError")]
    #[serde(rename = "type", default)]
    tour_type: TourType,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    transfer_cost: Option<f64>,
}

impl From<LegacyHotel> for HotelChoice {
    fn from(hotel: LegacyHotel) -> Self {
        HotelChoice {
            hotel_id: hotel.id,
            name: hotel.name,
            rate: hotel.rate,
            extra_bed_rate: hotel.extra_bed_rate,
        }
    }
}

impl From<LegacyTour> for TourSelection {
    fn from(tour: LegacyTour) -> Self {
        TourSelection {
            id: tour.id,
            name: tour.name,
            cost_per_person: tour.cost_per_person,
            tour_type: tour.tour_type,
            transfer_cost: tour.transfer_cost,
        }
    }
}

/// What could be recovered from a legacy notes field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LegacyQuote {
    pub notes: String,
    pub hotels: Vec<HotelChoice>,
    pub tours: Vec<TourSelection>,
    pub pax: Option<PaxComposition>,
    pub exchange_rate: f64,
}

/// Split notes at the marker and parse the payload. A missing or broken
/// payload yields empty structures; a missing hotel list falls back to the
/// previously selected hotel.
pub fn parse_notes(notes: &str) -> LegacyQuote {
    let (text, payload) = match notes.split_once(NOTES_MARKER) {
        Some((text, raw)) => {
            let payload = serde_json::from_str::<LegacyPayload>(raw.trim()).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable legacy quote payload: {}", err);
                LegacyPayload::default()
            });
            (text, payload)
        }
        None => (notes, LegacyPayload::default()),
    };

    let hotels: Vec<HotelChoice> = if payload.hotel_options.is_empty() {
        payload.selected_hotel.into_iter().map(HotelChoice::from).collect()
    } else {
        payload.hotel_options.into_iter().map(HotelChoice::from).collect()
    };

    LegacyQuote {
        notes: text.trim().to_string(),
        hotels,
        tours: payload.tours.into_iter().map(TourSelection::from).collect(),
        pax: payload.pax,
        exchange_rate: payload
            .exchange_rate
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .unwrap_or(LEGACY_AED_PER_USD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let notes = format!(
            "Client prefers sea view\n{}\n{}",
            NOTES_MARKER,
            r#"{
                "hotelOptions": [
                    {"id": "h1", "name": "Atlantis", "rate": 1200, "extraBedRate": 300},
                    {"name": "Rove Downtown", "rate": 380}
                ],
                "selectedHotel": {"name": "Atlantis", "rate": 1200},
                "tours": [{"name": "Burj Khalifa", "costPerPerson": 169, "type": "private", "transferCost": 250}],
                "pax": {"adults": 2, "cwb": 1, "cnb": 0, "infants": 0},
                "exchangeRate": 3.67
            }"#
        );
        let legacy = parse_notes(&notes);
        assert_eq!(legacy.notes, "Client prefers sea view");
        assert_eq!(legacy.hotels.len(), 2);
        assert_eq!(legacy.hotels[0].extra_bed_rate, 300.0);
        assert_eq!(legacy.hotels[1].hotel_id, None);
        assert_eq!(legacy.tours[0].tour_type, TourType::Private);
        assert_eq!(legacy.tours[0].transfer_cost, Some(250.0));
        assert_eq!(legacy.pax, Some(PaxComposition::new(2, 1, 0, 0)));
        assert_eq!(legacy.exchange_rate, 3.67);
    }

    #[test]
    fn test_falls_back_to_selected_hotel() {
        let notes = format!(
            "{}{}",
            NOTES_MARKER,
            r#"{"selectedHotel": {"name": "Rove Downtown", "rate": 380}}"#
        );
        let legacy = parse_notes(&notes);
        assert_eq!(legacy.hotels.len(), 1);
        assert_eq!(legacy.hotels[0].name, "Rove Downtown");
        assert_eq!(legacy.exchange_rate, LEGACY_AED_PER_USD);
    }

    #[test]
    fn test_empty_and_string_numbers_keep_the_payload() {
        let notes = format!(
            "{}{}",
            NOTES_MARKER,
            r#"{
                "hotelOptions": [{"name": "Atlantis", "rate": "1200", "extraBedRate": ""}],
                "tours": [
                    {"name": "Dhow Cruise", "costPerPerson": 90, "type": "private", "transferCost": ""},
                    {"name": "Burj Khalifa", "costPerPerson": "169", "transferCost": "250"},
                    {"costPerPerson": 40}
                ],
                "pax": {"adults": 2, "cwb": 1},
                "exchangeRate": ""
            }"#
        );
        let legacy = parse_notes(&notes);
        assert_eq!(legacy.hotels.len(), 1);
        assert_eq!(legacy.hotels[0].rate, 1200.0);
        assert_eq!(legacy.hotels[0].extra_bed_rate, 0.0);
        // the nameless tour is dropped on its own
        assert_eq!(legacy.tours.len(), 2);
        assert_eq!(legacy.tours[0].transfer_cost, None);
        assert_eq!(legacy.tours[0].tour_type, TourType::Private);
        assert_eq!(legacy.tours[1].cost_per_person, 169.0);
        assert_eq!(legacy.tours[1].transfer_cost, Some(250.0));
        assert_eq!(legacy.pax, Some(PaxComposition::new(2, 1, 0, 0)));
        assert_eq!(legacy.exchange_rate, LEGACY_AED_PER_USD);
    }

    #[test]
    fn test_bad_pax_keeps_hotels() {
        let notes = format!(
            "{}{}",
            NOTES_MARKER,
            r#"{"selectedHotel": {"name": "Rove Downtown", "rate": 380}, "pax": {"adults": "two"}}"#
        );
        let legacy = parse_notes(&notes);
        assert_eq!(legacy.hotels.len(), 1);
        assert_eq!(legacy.pax, None);
    }

    #[test]
    fn test_broken_payload_defaults_to_empty() {
        let legacy = parse_notes(&format!("Call back Monday {} {{not json", NOTES_MARKER));
        assert_eq!(legacy.notes, "Call back Monday");
        assert!(legacy.hotels.is_empty());
        assert!(legacy.tours.is_empty());
        assert_eq!(legacy.pax, None);

        let plain = parse_notes("Just a note");
        assert_eq!(plain.notes, "Just a note");
        assert!(plain.hotels.is_empty());
    }
}
