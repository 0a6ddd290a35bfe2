use crate::config::PricingConfig;
use crate::models::{
    pax::{PaxComposition, RoomType},
    quote::{
        AddOns, Money, OptionKind, PricingOption, QuoteCalculation, QuoteDraft, TourLine,
        TourSelection, TourType, TransferCharge, VisaCharge,
    },
};
use crate::services::occupancy_service::{self, ApartmentSplit, NormalizedDraft, QuoteError};

pub struct PricingService;

/// Plain ceiling at every stage. Stored quotes were priced this way, float
/// noise included, so amounts must not be pre-rounded.
fn ceil_amount(value: f64) -> f64 {
    value.ceil()
}

/// Shared per-person components, identical across occupancy options.
struct Components {
    tours: f64,
    visa_adult: f64,
    visa_child: f64,
    transfer_per_adult: f64,
}

impl PricingService {
    /// ceil(rate x nights / divisor); 0 when the rate or nights are unusable
    pub fn hotel_cost_per_person(rate: f64, nights: u32, room: RoomType) -> f64 {
        if !rate.is_finite() || rate <= 0.0 || nights == 0 {
            return 0.0;
        }
        ceil_amount(rate * nights as f64 / room.divisor() as f64)
    }

    /// Ticket price plus, for private tours, an equal share of the vehicle
    pub fn tour_cost_per_person(tour: &TourSelection, paying_pax: u32) -> f64 {
        let ticket = if tour.cost_per_person.is_finite() {
            tour.cost_per_person.max(0.0)
        } else {
            0.0
        };
        let transfer_share = match (tour.tour_type, tour.transfer_cost) {
            (TourType::Private, Some(cost)) if cost.is_finite() && paying_pax > 0 => {
                cost / paying_pax as f64
            }
            _ => 0.0,
        };
        ticket + transfer_share
    }

    pub fn tours_cost_per_person(tours: &[TourSelection], paying_pax: u32) -> f64 {
        tours
            .iter()
            .map(|tour| Self::tour_cost_per_person(tour, paying_pax))
            .sum()
    }

    /// Tier price for the whole group; groups above the last band get 0
    pub fn transfer_tier(total_pax: u32, tiers: &[(u32, u32, f64)]) -> f64 {
        tiers
            .iter()
            .find(|(min, max, _)| (*min..=*max).contains(&total_pax))
            .map(|(_, _, price)| *price)
            .unwrap_or(0.0)
    }

    pub fn airport_transfer_total(add_ons: &AddOns, total_pax: u32, tiers: &[(u32, u32, f64)]) -> f64 {
        if !add_ons.include_airport_transfer {
            return 0.0;
        }
        match add_ons.manual_transfer_cost {
            Some(cost) if cost.is_finite() && cost > 0.0 => cost,
            _ => Self::transfer_tier(total_pax, tiers),
        }
    }

    /// Only adults share the airport transfer in the per-person figures.
    pub fn transfer_per_adult(total: f64, adults: u32) -> f64 {
        if adults == 0 {
            return 0.0;
        }
        total / adults as f64
    }

    pub fn to_usd(aed: f64, aed_per_usd: f64) -> f64 {
        (aed / aed_per_usd).ceil()
    }

    fn money(aed: f64, aed_per_usd: f64) -> Money {
        let aed = ceil_amount(aed);
        Money {
            aed,
            usd: Self::to_usd(aed, aed_per_usd),
        }
    }

    fn group_total(pax: &PaxComposition, adult: Money, cwb: Option<Money>, cnb: Option<Money>) -> Money {
        let cwb = cwb.unwrap_or_default();
        let cnb = cnb.unwrap_or_default();
        Money {
            aed: pax.adults as f64 * adult.aed + pax.cwb as f64 * cwb.aed + pax.cnb as f64 * cnb.aed,
            usd: pax.adults as f64 * adult.usd + pax.cwb as f64 * cwb.usd + pax.cnb as f64 * cnb.usd,
        }
    }

    fn cnb_cost(pax: &PaxComposition, parts: &Components, rate: f64) -> Option<Money> {
        (pax.cnb > 0).then(|| Self::money(parts.tours + parts.visa_child, rate))
    }

    fn room_option(
        draft: &QuoteDraft,
        normalized: &NormalizedDraft<'_>,
        room: RoomType,
        parts: &Components,
        rate: f64,
    ) -> PricingOption {
        let pax = &draft.pax;
        let hotel = normalized.hotel;
        let stay_cost = hotel.rate * normalized.nights as f64;

        let (hotel_per_person, adult_base, cwb_base) =
            if normalized.special_double && room == RoomType::Double {
                let half = stay_cost / 2.0;
                (ceil_amount(half), half, half)
            } else {
                let per_person = Self::hotel_cost_per_person(hotel.rate, normalized.nights, room);
                let extra_bed = ceil_amount(hotel.extra_bed_rate * normalized.nights as f64);
                (per_person, per_person, extra_bed)
            };

        let adult = Self::money(
            adult_base + parts.tours + parts.visa_adult + parts.transfer_per_adult,
            rate,
        );
        let cwb = (pax.cwb > 0)
            .then(|| Self::money(cwb_base + parts.tours + parts.visa_child, rate));
        let cnb = Self::cnb_cost(pax, parts, rate);

        PricingOption {
            label: room.label().to_string(),
            kind: OptionKind::Room(room),
            hotel_per_person,
            adult,
            cwb,
            cnb,
            group_total: Self::group_total(pax, adult, cwb, cnb),
        }
    }

    fn apartment_option(
        draft: &QuoteDraft,
        normalized: &NormalizedDraft<'_>,
        split: &ApartmentSplit,
        parts: &Components,
        rate: f64,
    ) -> PricingOption {
        let pax = &draft.pax;
        let hotel = normalized.hotel;
        let nights = normalized.nights as f64;

        let sharers = pax.adults.saturating_add(split.cwb_without_extra_bed);
        let share = if sharers > 0 {
            hotel.rate * nights / sharers as f64
        } else {
            0.0
        };

        let adult = Self::money(
            share + parts.tours + parts.visa_adult + parts.transfer_per_adult,
            rate,
        );

        let cwb = (pax.cwb > 0).then(|| {
            let shared = ceil_amount(share + parts.tours + parts.visa_child);
            let extra = ceil_amount(hotel.extra_bed_rate * nights + parts.tours + parts.visa_child);
            let blended = (split.cwb_without_extra_bed as f64 * shared
                + split.cwb_with_extra_bed as f64 * extra)
                / pax.cwb as f64;
            Self::money(blended, rate)
        });
        let cnb = Self::cnb_cost(pax, parts, rate);

        PricingOption {
            label: split.apartment_type.label(),
            kind: OptionKind::Apartment(split.apartment_type),
            hotel_per_person: ceil_amount(share),
            adult,
            cwb,
            cnb,
            group_total: Self::group_total(pax, adult, cwb, cnb),
        }
    }

    /// Price a draft. Validation runs first; nothing is derived from a
    /// rejected draft.
    pub fn calculate(draft: &QuoteDraft, config: &PricingConfig) -> Result<QuoteCalculation, QuoteError> {
        let normalized = occupancy_service::normalize(draft)?;
        let pax = draft.pax;
        let rate = config.aed_per_usd;
        let add_ons = &draft.add_ons;

        let paying_pax = pax.paying_pax();
        let tours: Vec<TourLine> = draft
            .tours
            .iter()
            .map(|tour| TourLine {
                name: tour.name.clone(),
                per_person: Self::tour_cost_per_person(tour, paying_pax),
            })
            .collect();
        let tours_per_person = Self::tours_cost_per_person(&draft.tours, paying_pax);

        let visa = add_ons.include_visa.then(|| VisaCharge {
            adult_aed: config.visa_adult_aed,
            child_aed: config.visa_child_aed,
            infant_usd: config.visa_infant_usd,
        });

        let airport_transfer = add_ons.include_airport_transfer.then(|| {
            let total = Self::airport_transfer_total(add_ons, pax.total_pax(), &config.transfer_tiers);
            TransferCharge {
                total_aed: total,
                per_adult_aed: Self::transfer_per_adult(total, pax.adults),
            }
        });

        let parts = Components {
            tours: tours_per_person,
            visa_adult: visa.map(|v| v.adult_aed).unwrap_or(0.0),
            visa_child: visa.map(|v| v.child_aed).unwrap_or(0.0),
            transfer_per_adult: airport_transfer.map(|t| t.per_adult_aed).unwrap_or(0.0),
        };

        let (options, extra_bed_required) = match &normalized.apartment {
            Some(split) => (
                vec![Self::apartment_option(draft, &normalized, split, &parts, rate)],
                split.cwb_with_extra_bed > 0,
            ),
            None => {
                let rooms = draft.occupancy.room_types();
                let extra_bed = pax.cwb > 0
                    && rooms
                        .iter()
                        .any(|room| !(normalized.special_double && *room == RoomType::Double));
                let options = rooms
                    .into_iter()
                    .map(|room| Self::room_option(draft, &normalized, room, &parts, rate))
                    .collect();
                (options, extra_bed)
            }
        };

        log::debug!(
            "Priced quote for {}: {} nights, {} option(s)",
            pax.summary(),
            normalized.nights,
            options.len()
        );

        Ok(QuoteCalculation {
            stay: draft.stay,
            nights: normalized.nights,
            pax,
            hotel_name: normalized.hotel.name.clone(),
            hotel_rate: normalized.hotel.rate,
            extra_bed_rate: normalized.hotel.extra_bed_rate,
            tours,
            tours_per_person,
            visa,
            airport_transfer,
            options,
            special_double: normalized.special_double,
            extra_bed_required,
            exchange_rate: rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        pax::{ApartmentType, OccupancySelection, StayPeriod},
        quote::HotelChoice,
    };
    use chrono::NaiveDate;

    fn rooms(single: bool, double: bool, triple: bool) -> OccupancySelection {
        OccupancySelection::Rooms {
            single,
            double,
            triple,
        }
    }

    fn draft(pax: PaxComposition, occupancy: OccupancySelection) -> QuoteDraft {
        QuoteDraft {
            client_name: "Al Mansoori".to_string(),
            stay: StayPeriod::new(
                NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            ),
            pax,
            occupancy,
            hotel: Some(HotelChoice {
                hotel_id: None,
                name: "Creek Hotel".to_string(),
                rate: 500.0,
                extra_bed_rate: 150.0,
            }),
            tours: Vec::new(),
            add_ons: AddOns::default(),
            inclusions: Vec::new(),
        }
    }

    fn private_tour(cost: f64, transfer: f64) -> TourSelection {
        TourSelection {
            id: None,
            name: "Abu Dhabi City Tour".to_string(),
            cost_per_person: cost,
            tour_type: TourType::Private,
            transfer_cost: Some(transfer),
        }
    }

    #[test]
    fn test_hotel_cost_per_person() {
        assert_eq!(PricingService::hotel_cost_per_person(500.0, 3, RoomType::Double), 750.0);
        assert_eq!(PricingService::hotel_cost_per_person(500.0, 3, RoomType::Single), 1500.0);
        assert_eq!(PricingService::hotel_cost_per_person(500.0, 3, RoomType::Triple), 500.0);
        assert_eq!(PricingService::hotel_cost_per_person(505.0, 1, RoomType::Triple), 169.0);
        assert_eq!(PricingService::hotel_cost_per_person(0.0, 3, RoomType::Double), 0.0);
        assert_eq!(PricingService::hotel_cost_per_person(500.0, 0, RoomType::Double), 0.0);
        assert_eq!(PricingService::hotel_cost_per_person(f64::NAN, 3, RoomType::Double), 0.0);
    }

    #[test]
    fn test_sub_cent_amounts_still_round_up() {
        assert_eq!(PricingService::hotel_cost_per_person(100.004, 1, RoomType::Single), 101.0);
        assert_eq!(PricingService::hotel_cost_per_person(200.008, 1, RoomType::Double), 101.0);

        let mut d = draft(PaxComposition::new(1, 0, 0, 0), rooms(true, false, false));
        d.hotel = Some(HotelChoice {
            hotel_id: None,
            name: "Deira Inn".to_string(),
            rate: 100.001,
            extra_bed_rate: 0.0,
        });
        let calc = PricingService::calculate(&d, &PricingConfig::default()).unwrap();
        // 300.003 for three nights
        assert_eq!(calc.options[0].hotel_per_person, 301.0);
        assert_eq!(calc.options[0].adult.aed, 301.0);
    }

    #[test]
    fn test_tour_costs_split_private_transfer() {
        let tours = vec![
            private_tour(100.0, 300.0),
            TourSelection {
                id: None,
                name: "Desert Safari".to_string(),
                cost_per_person: 150.0,
                tour_type: TourType::Group,
                transfer_cost: Some(999.0),
            },
        ];
        assert_eq!(PricingService::tours_cost_per_person(&tours, 3), 350.0);
        // no paying pax: the share is dropped rather than dividing by zero
        assert_eq!(PricingService::tour_cost_per_person(&tours[0], 0), 100.0);
    }

    #[test]
    fn test_transfer_tiers() {
        let tiers = PricingConfig::default().transfer_tiers;
        assert_eq!(PricingService::transfer_tier(1, &tiers), 250.0);
        assert_eq!(PricingService::transfer_tier(5, &tiers), 250.0);
        assert_eq!(PricingService::transfer_tier(7, &tiers), 500.0);
        assert_eq!(PricingService::transfer_tier(17, &tiers), 1000.0);
        assert_eq!(PricingService::transfer_tier(20, &tiers), 0.0);
        assert_eq!(PricingService::transfer_tier(0, &tiers), 0.0);

        let add_ons = AddOns {
            include_visa: false,
            include_airport_transfer: true,
            manual_transfer_cost: None,
        };
        assert_eq!(PricingService::airport_transfer_total(&add_ons, 7, &tiers), 500.0);
        assert_eq!(PricingService::airport_transfer_total(&add_ons, 20, &tiers), 0.0);

        let manual = AddOns {
            manual_transfer_cost: Some(420.0),
            ..add_ons.clone()
        };
        assert_eq!(PricingService::airport_transfer_total(&manual, 7, &tiers), 420.0);

        let zero_manual = AddOns {
            manual_transfer_cost: Some(0.0),
            ..add_ons
        };
        assert_eq!(PricingService::airport_transfer_total(&zero_manual, 3, &tiers), 250.0);
    }

    #[test]
    fn test_standard_rooms_with_all_add_ons() {
        let mut d = draft(PaxComposition::new(2, 1, 1, 1), rooms(false, true, true));
        d.tours = vec![private_tour(100.0, 400.0)];
        d.add_ons = AddOns {
            include_visa: true,
            include_airport_transfer: true,
            manual_transfer_cost: None,
        };

        let calc = PricingService::calculate(&d, &PricingConfig::default()).unwrap();
        assert_eq!(calc.nights, 3);
        assert!(!calc.special_double);
        assert!(calc.extra_bed_required);
        assert_eq!(calc.tours_per_person, 200.0);
        assert_eq!(calc.airport_transfer.unwrap().per_adult_aed, 125.0);
        assert_eq!(calc.options.len(), 2);

        let double = &calc.options[0];
        assert_eq!(double.label, "Double");
        // 750 hotel + 200 tours + 310 visa + 125 transfer
        assert_eq!(double.adult.aed, 1385.0);
        assert_eq!(double.adult.usd, (1385.0f64 / 3.67).ceil());
        // 450 extra bed + 200 tours + 73 visa
        assert_eq!(double.cwb.unwrap().aed, 723.0);
        assert_eq!(double.cnb.unwrap().aed, 273.0);
        assert_eq!(double.group_total.aed, 2.0 * 1385.0 + 723.0 + 273.0);

        let triple = &calc.options[1];
        assert_eq!(triple.adult.aed, 500.0 + 200.0 + 310.0 + 125.0);
    }

    #[test]
    fn test_special_double_halves_the_room() {
        let mut d = draft(PaxComposition::new(2, 2, 0, 0), rooms(true, true, false));
        d.add_ons.include_visa = true;
        let calc = PricingService::calculate(&d, &PricingConfig::default()).unwrap();
        assert!(calc.special_double);

        let single = &calc.options[0];
        assert_eq!(single.adult.aed, 1500.0 + 310.0);
        assert_eq!(single.cwb.unwrap().aed, 450.0 + 73.0);

        let double = &calc.options[1];
        assert_eq!(double.hotel_per_person, 750.0);
        assert_eq!(double.adult.aed, 750.0 + 310.0);
        assert_eq!(double.cwb.unwrap().aed, 750.0 + 73.0);
        // single still charges the extra bed
        assert!(calc.extra_bed_required);

        let d = draft(PaxComposition::new(1, 1, 0, 0), rooms(false, true, false));
        let calc = PricingService::calculate(&d, &PricingConfig::default()).unwrap();
        assert!(calc.special_double);
        assert!(!calc.extra_bed_required);
        assert_eq!(calc.options[0].cwb.unwrap().aed, 750.0);
    }

    #[test]
    fn test_apartment_blends_child_rates() {
        let mut d = draft(
            PaxComposition::new(1, 2, 0, 0),
            OccupancySelection::Apartment {
                apartment_type: ApartmentType::OneBedroom,
            },
        );
        d.add_ons.include_airport_transfer = true;
        let calc = PricingService::calculate(&d, &PricingConfig::default()).unwrap();
        assert_eq!(calc.options.len(), 1);
        assert!(calc.extra_bed_required);

        let apartment = &calc.options[0];
        assert_eq!(apartment.label, "01BR Apartment");
        // 1500 split across the adult and one child sharing capacity
        assert_eq!(apartment.hotel_per_person, 750.0);
        assert_eq!(apartment.adult.aed, 750.0 + 250.0);
        // (750 + 450) / 2
        assert_eq!(apartment.cwb.unwrap().aed, 600.0);
        assert!(apartment.cnb.is_none());
    }

    #[test]
    fn test_two_bedroom_with_children_on_both_rates() {
        let mut d = draft(
            PaxComposition::new(2, 3, 1, 0),
            OccupancySelection::Apartment {
                apartment_type: ApartmentType::TwoBedroom,
            },
        );
        d.add_ons.include_visa = true;
        let calc = PricingService::calculate(&d, &PricingConfig::default()).unwrap();
        assert!(calc.extra_bed_required);

        let apartment = &calc.options[0];
        assert_eq!(apartment.label, "02BR Apartment");
        // 1500 shared by two adults and the one child inside capacity
        assert_eq!(apartment.hotel_per_person, 500.0);
        assert_eq!(apartment.adult.aed, 500.0 + 310.0);
        // (1 x 573 + 2 x 523) / 3 = 539.67
        assert_eq!(apartment.cwb.unwrap().aed, 540.0);
        assert_eq!(apartment.cnb, Some(Money { aed: 73.0, usd: 20.0 }));
        assert_eq!(apartment.group_total.aed, 2.0 * 810.0 + 3.0 * 540.0 + 73.0);
    }

    #[test]
    fn test_child_without_bed_breaks_special_double() {
        let mut d = draft(PaxComposition::new(2, 2, 1, 0), rooms(false, true, false));
        d.tours = vec![TourSelection {
            id: None,
            name: "Desert Safari".to_string(),
            cost_per_person: 150.0,
            tour_type: TourType::Group,
            transfer_cost: None,
        }];
        d.add_ons.include_visa = true;
        let calc = PricingService::calculate(&d, &PricingConfig::default()).unwrap();
        assert!(!calc.special_double);
        assert!(calc.extra_bed_required);

        let double = &calc.options[0];
        assert_eq!(double.hotel_per_person, 750.0);
        assert_eq!(double.adult.aed, 750.0 + 150.0 + 310.0);
        assert_eq!(double.cwb.unwrap().aed, 450.0 + 150.0 + 73.0);
        // tours plus child visa, no hotel share
        assert_eq!(double.cnb.unwrap().aed, 223.0);
    }

    #[test]
    fn test_usd_ceiled_from_ceiled_aed() {
        let mut d = draft(PaxComposition::new(3, 0, 0, 0), rooms(false, false, true));
        d.hotel = Some(HotelChoice {
            hotel_id: None,
            name: "Deira Inn".to_string(),
            rate: 101.0,
            extra_bed_rate: 0.0,
        });
        let calc = PricingService::calculate(&d, &PricingConfig::default()).unwrap();
        // 303 / 3 = 101 per person, 101 / 3.67 = 27.52 -> 28
        assert_eq!(calc.options[0].adult, Money { aed: 101.0, usd: 28.0 });
    }

    #[test]
    fn test_rejected_draft_has_no_calculation() {
        let mut d = draft(PaxComposition::default(), rooms(false, true, false));
        d.stay.check_out = d.stay.check_in;
        assert_eq!(
            PricingService::calculate(&d, &PricingConfig::default()),
            Err(QuoteError::NoNights { nights: 0 })
        );
    }
}
