use crate::models::quote::{ItemType, Traffic, VehicleClass, Weather};

pub const BASE_FARE: f64 = 3.5;
pub const PER_MILE_RATE: f64 = 1.45;
pub const ACCESS_FEE: f64 = 1.25;
pub const SURGE: f64 = 1.075;

pub const FREE_WEIGHT_LB: f64 = 5.0;
pub const PER_EXTRA_LB: f64 = 0.15;

/// Reference parcel volume (12 x 8 x 6 in) that maps to a size factor of 1.0.
pub const REFERENCE_VOLUME_IN3: f64 = 12.0 * 8.0 * 6.0;
pub const SIZE_EXPONENT: f64 = 0.35;
pub const MIN_SIZE_FACTOR: f64 = 0.75;
pub const MAX_SIZE_FACTOR: f64 = 2.0;

pub const MIN_PRICE: f64 = 4.5;
pub const MAX_PRICE: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    /// Nominal speed in mph before weather/traffic.
    pub speed_mph: f64,
    pub price_mult: f64,
    /// Flat addend, zero or negative for low-emission vehicles.
    pub env_credit: f64,
}

const fn profile(speed_mph: f64, price_mult: f64, env_credit: f64) -> VehicleProfile {
    VehicleProfile {
        speed_mph,
        price_mult,
        env_credit,
    }
}

pub fn vehicle_profile(vehicle: VehicleClass) -> VehicleProfile {
    match vehicle {
        VehicleClass::Bike => profile(12.0, 0.90, -0.35),
        VehicleClass::CargoBike => profile(11.0, 1.00, -0.30),
        VehicleClass::EBike => profile(14.0, 0.95, -0.30),
        VehicleClass::Scooter => profile(18.0, 0.95, 0.00),
        VehicleClass::Motorcycle => profile(28.0, 1.05, 0.00),
        VehicleClass::Car => profile(24.0, 1.00, 0.00),
        VehicleClass::EvCompact => profile(24.0, 0.98, -0.10),
        VehicleClass::EvSedan => profile(24.0, 1.02, -0.10),
        VehicleClass::Suv => profile(22.0, 1.15, 0.00),
        VehicleClass::EvSuv => profile(22.0, 1.12, -0.08),
        VehicleClass::Van => profile(21.0, 1.22, 0.00),
        VehicleClass::EvVan => profile(21.0, 1.20, -0.06),
        VehicleClass::TruckLight => profile(20.0, 1.35, 0.00),
        VehicleClass::TruckBox => profile(19.0, 1.50, 0.00),
    }
}

pub fn item_multiplier(item: ItemType) -> f64 {
    match item {
        ItemType::General => 1.0,
        ItemType::Electronics => 1.2,
        ItemType::Fragile => 1.25,
        ItemType::Perishable => 1.15,
        ItemType::Oversize => 1.4,
    }
}

pub fn weather_multiplier(weather: Weather) -> f64 {
    match weather {
        Weather::Clear => 1.0,
        Weather::Rain => 1.08,
        Weather::Snow => 1.18,
        Weather::Extreme => 1.35,
    }
}

pub fn traffic_multiplier(traffic: Traffic) -> f64 {
    match traffic {
        Traffic::Low => 1.0,
        Traffic::Med => 1.15,
        Traffic::High => 1.35,
    }
}
