use std::fmt;

use crate::models::{
    pax::{ApartmentType, OccupancySelection, PaxComposition},
    quote::{HotelChoice, QuoteDraft},
};

#[derive(Debug, Clone, PartialEq)]
pub enum QuoteError {
    NoNights { nights: i64 },
    NoTravellers,
    NoAdults,
    NoOccupancySelected,
    MissingHotel,
    InvalidRate { field: &'static str },
    ApartmentCapacityExceeded {
        apartment: &'static str,
        detail: String,
    },
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteError::NoNights { nights } => write!(
                f,
                "Check-out must be after check-in (got {} nights)",
                nights
            ),
            QuoteError::NoTravellers => write!(f, "Add at least one traveller"),
            QuoteError::NoAdults => write!(f, "At least one adult is required"),
            QuoteError::NoOccupancySelected => {
                write!(f, "Select at least one occupancy type")
            }
            QuoteError::MissingHotel => write!(f, "Select a hotel"),
            QuoteError::InvalidRate { field } => {
                write!(f, "Enter a valid {} (AED per night)", field)
            }
            QuoteError::ApartmentCapacityExceeded { apartment, detail } => {
                write!(f, "{} apartment capacity exceeded: {}", apartment, detail)
            }
        }
    }
}

impl std::error::Error for QuoteError {}

/// How children with bed fit into an apartment's sleeping capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApartmentSplit {
    pub apartment_type: ApartmentType,
    pub cwb_without_extra_bed: u32,
    pub cwb_with_extra_bed: u32,
}

/// Draft facts the calculator relies on once validation has passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedDraft<'a> {
    pub nights: u32,
    pub hotel: &'a HotelChoice,
    pub special_double: bool,
    pub apartment: Option<ApartmentSplit>,
}

/// Adults and children with bed pair up one-to-one in double rooms and each
/// pays half the room instead of an extra bed.
pub fn is_special_double(pax: &PaxComposition) -> bool {
    let paired = pax.adults == pax.cwb && pax.adults % 2 == 0 && pax.cnb == 0;
    let single_pair = pax.adults == 1 && pax.cwb == 1 && pax.cnb == 0;
    pax.cwb > 0 && (paired || single_pair)
}

pub fn apartment_split(pax: &PaxComposition, apartment_type: ApartmentType) -> ApartmentSplit {
    let capacity = apartment_type.capacity();
    let capacity_left = capacity.adult_cap as i64 - pax.adults as i64 - pax.cnb as i64;
    let cwb = pax.cwb as i64;
    let without = cwb.min(capacity_left).max(0);
    let with = (cwb - without).max(0);

    ApartmentSplit {
        apartment_type,
        cwb_without_extra_bed: without as u32,
        cwb_with_extra_bed: with as u32,
    }
}

fn valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate >= 0.0
}

fn check_capacity(pax: &PaxComposition, split: &ApartmentSplit) -> Result<(), QuoteError> {
    let capacity = split.apartment_type.capacity();
    let apartment = split.apartment_type.code();

    if pax.adults > capacity.adult_cap {
        return Err(QuoteError::ApartmentCapacityExceeded {
            apartment,
            detail: format!("{} adults for {} places", pax.adults, capacity.adult_cap),
        });
    }
    if pax.cnb > capacity.cnb_cap {
        return Err(QuoteError::ApartmentCapacityExceeded {
            apartment,
            detail: format!("{} children without bed, max {}", pax.cnb, capacity.cnb_cap),
        });
    }
    if split.cwb_with_extra_bed > capacity.max_cwb {
        return Err(QuoteError::ApartmentCapacityExceeded {
            apartment,
            detail: format!(
                "{} extra beds needed, max {}",
                split.cwb_with_extra_bed, capacity.max_cwb
            ),
        });
    }
    Ok(())
}

/// Validate a draft before any cost is derived.
pub fn normalize(draft: &QuoteDraft) -> Result<NormalizedDraft<'_>, QuoteError> {
    let nights = draft.stay.nights();
    if nights <= 0 {
        return Err(QuoteError::NoNights { nights });
    }

    let pax = &draft.pax;
    if pax.total_pax() < 1 {
        return Err(QuoteError::NoTravellers);
    }
    if pax.adults < 1 {
        return Err(QuoteError::NoAdults);
    }

    if !draft.occupancy.is_apartment() && draft.occupancy.room_types().is_empty() {
        return Err(QuoteError::NoOccupancySelected);
    }

    let hotel = draft.hotel.as_ref().ok_or(QuoteError::MissingHotel)?;
    if hotel.name.trim().is_empty() {
        return Err(QuoteError::MissingHotel);
    }
    if !valid_rate(hotel.rate) {
        return Err(QuoteError::InvalidRate {
            field: "hotel rate",
        });
    }
    if !valid_rate(hotel.extra_bed_rate) {
        return Err(QuoteError::InvalidRate {
            field: "extra bed rate",
        });
    }

    let apartment = match draft.occupancy {
        OccupancySelection::Apartment { apartment_type } => {
            let split = apartment_split(pax, apartment_type);
            check_capacity(pax, &split)?;
            Some(split)
        }
        OccupancySelection::Rooms { .. } => None,
    };

    Ok(NormalizedDraft {
        nights: nights as u32,
        hotel,
        special_double: apartment.is_none() && is_special_double(pax),
        apartment,
    })
}
