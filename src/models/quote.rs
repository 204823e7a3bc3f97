use serde::{Deserialize, Serialize};

use crate::models::location::{GeoPoint, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Bike,
    CargoBike,
    EBike,
    Scooter,
    Motorcycle,
    Car,
    EvCompact,
    EvSedan,
    Suv,
    EvSuv,
    Van,
    EvVan,
    TruckLight,
    TruckBox,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 14] = [
        VehicleClass::Bike,
        VehicleClass::CargoBike,
        VehicleClass::EBike,
        VehicleClass::Scooter,
        VehicleClass::Motorcycle,
        VehicleClass::Car,
        VehicleClass::EvCompact,
        VehicleClass::EvSedan,
        VehicleClass::Suv,
        VehicleClass::EvSuv,
        VehicleClass::Van,
        VehicleClass::EvVan,
        VehicleClass::TruckLight,
        VehicleClass::TruckBox,
    ];

    /// Unrecognized labels price as a car.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bike" => VehicleClass::Bike,
            "cargo_bike" => VehicleClass::CargoBike,
            "e_bike" => VehicleClass::EBike,
            "scooter" => VehicleClass::Scooter,
            "motorcycle" => VehicleClass::Motorcycle,
            "ev_compact" => VehicleClass::EvCompact,
            "ev_sedan" => VehicleClass::EvSedan,
            "suv" => VehicleClass::Suv,
            "ev_suv" => VehicleClass::EvSuv,
            "van" => VehicleClass::Van,
            "ev_van" => VehicleClass::EvVan,
            "truck_light" => VehicleClass::TruckLight,
            "truck_box" => VehicleClass::TruckBox,
            _ => VehicleClass::Car,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    General,
    Electronics,
    Fragile,
    Perishable,
    Oversize,
}

impl ItemType {
    /// Unrecognized labels price as general goods.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "electronics" => ItemType::Electronics,
            "fragile" => ItemType::Fragile,
            "perishable" => ItemType::Perishable,
            "oversize" => ItemType::Oversize,
            _ => ItemType::General,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Clear,
    Rain,
    Snow,
    Extreme,
}

impl Weather {
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rain" => Weather::Rain,
            "snow" => Weather::Snow,
            "extreme" => Weather::Extreme,
            _ => Weather::Clear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Traffic {
    Low,
    Med,
    High,
}

impl Traffic {
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Traffic::Low,
            "high" => Traffic::High,
            _ => Traffic::Med,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Saver,
    Standard,
    Priority,
    #[serde(rename = "Pro Load")]
    ProLoad,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Saver => "Saver",
            Tier::Standard => "Standard",
            Tier::Priority => "Priority",
            Tier::ProLoad => "Pro Load",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_in: f64,
    pub width_in: f64,
    pub height_in: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            length_in: 12.0,
            width_in: 8.0,
            height_in: 6.0,
        }
    }
}

/// Fully resolved input to the quote engine.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub vehicle: VehicleClass,
    pub item_type: ItemType,
    pub quantity: u32,
    pub weight_lb: f64,
    pub dimensions: Dimensions,
    pub weather: Weather,
    pub traffic: Traffic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub price: f64,
    pub eta_minutes: u32,
    pub miles: f64,
    pub tier: Tier,
}

/// Quote payload as it arrives over the wire. Category fields stay as raw
/// strings so unknown values can degrade to defaults instead of failing
/// deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteInput {
    pub pickup: Location,
    pub dropoff: Location,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub weight_lb: Option<f64>,
    #[serde(default)]
    pub length_in: Option<f64>,
    #[serde(default)]
    pub width_in: Option<f64>,
    #[serde(default)]
    pub height_in: Option<f64>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub traffic: Option<String>,
}
