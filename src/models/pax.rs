use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Travellers on a quote, split by pricing category.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PaxComposition {
    pub adults: u32,
    /// Child with bed, 6-17 years.
    #[serde(default)]
    pub cwb: u32,
    /// Child no bed, 3-5 years.
    #[serde(default)]
    pub cnb: u32,
    #[serde(default)]
    pub infants: u32,
}

impl Default for PaxComposition {
    fn default() -> Self {
        Self {
            adults: 1,
            cwb: 0,
            cnb: 0,
            infants: 0,
        }
    }
}

impl PaxComposition {
    pub fn new(adults: u32, cwb: u32, cnb: u32, infants: u32) -> Self {
        Self {
            adults,
            cwb,
            cnb,
            infants,
        }
    }

    pub fn total_pax(&self) -> u32 {
        self.paying_pax().saturating_add(self.infants)
    }

    /// Travellers that share tour transfer costs (infants ride free).
    pub fn paying_pax(&self) -> u32 {
        self.adults.saturating_add(self.children())
    }

    pub fn children(&self) -> u32 {
        self.cwb.saturating_add(self.cnb)
    }

    pub fn has_children(&self) -> bool {
        self.children() > 0
    }

    /// "2 Adults + 1 CWB + 1 Infant", zero categories omitted.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "{} {}",
            self.adults,
            if self.adults == 1 { "Adult" } else { "Adults" }
        )];
        if self.cwb > 0 {
            parts.push(format!("{} CWB", self.cwb));
        }
        if self.cnb > 0 {
            parts.push(format!("{} CNB", self.cnb));
        }
        if self.infants > 0 {
            parts.push(format!(
                "{} {}",
                self.infants,
                if self.infants == 1 { "Infant" } else { "Infants" }
            ));
        }
        parts.join(" + ")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct StayPeriod {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayPeriod {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in,
            check_out,
        }
    }

    /// Signed so that a check-out before check-in is visible to validation.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum RoomType {
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "triple")]
    Triple,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [RoomType::Single, RoomType::Double, RoomType::Triple];

    /// Number of adults splitting one room.
    pub fn divisor(&self) -> u32 {
        match self {
            RoomType::Single => 1,
            RoomType::Double => 2,
            RoomType::Triple => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Single => "Single",
            RoomType::Double => "Double",
            RoomType::Triple => "Triple",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApartmentCapacity {
    pub adult_cap: u32,
    pub cnb_cap: u32,
    pub max_cwb: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ApartmentType {
    #[serde(rename = "01BR")]
    OneBedroom,
    #[serde(rename = "02BR")]
    TwoBedroom,
    #[serde(rename = "03BR")]
    ThreeBedroom,
}

impl ApartmentType {
    pub fn capacity(&self) -> ApartmentCapacity {
        match self {
            ApartmentType::OneBedroom => ApartmentCapacity {
                adult_cap: 2,
                cnb_cap: 1,
                max_cwb: 1,
            },
            ApartmentType::TwoBedroom => ApartmentCapacity {
                adult_cap: 4,
                cnb_cap: 2,
                max_cwb: 2,
            },
            ApartmentType::ThreeBedroom => ApartmentCapacity {
                adult_cap: 6,
                cnb_cap: 3,
                max_cwb: 3,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApartmentType::OneBedroom => "01BR",
            ApartmentType::TwoBedroom => "02BR",
            ApartmentType::ThreeBedroom => "03BR",
        }
    }

    pub fn label(&self) -> String {
        format!("{} Apartment", self.code())
    }
}

/// Room-sharing choice for a quote: hotel room types or a whole apartment.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OccupancySelection {
    Rooms {
        #[serde(default)]
        single: bool,
        #[serde(default)]
        double: bool,
        #[serde(default)]
        triple: bool,
    },
    Apartment {
        apartment_type: ApartmentType,
    },
}

impl OccupancySelection {
    pub fn is_apartment(&self) -> bool {
        matches!(self, OccupancySelection::Apartment { .. })
    }

    /// Selected room types in display order. Empty in apartment mode.
    pub fn room_types(&self) -> Vec<RoomType> {
        match self {
            OccupancySelection::Rooms {
                single,
                double,
                triple,
            } => RoomType::ALL
                .into_iter()
                .zip([*single, *double, *triple])
                .filter_map(|(room, selected)| selected.then_some(room))
                .collect(),
            OccupancySelection::Apartment { .. } => Vec::new(),
        }
    }
}
