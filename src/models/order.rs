use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::location::GeoPoint;
use crate::models::quote::{Dimensions, ItemType, Tier, Traffic, VehicleClass, Weather};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Assigned,
    PickedUp,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Assigned,
        OrderStatus::PickedUp,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Assigned => "assigned",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Canceled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "pending" => Ok(OrderStatus::Pending),
            "assigned" => Ok(OrderStatus::Assigned),
            "picked_up" => Ok(OrderStatus::PickedUp),
            "delivered" => Ok(OrderStatus::Delivered),
            "canceled" => Ok(OrderStatus::Canceled),
            other => Err(AppError::InvalidInput(format!("invalid status: {other}"))),
        }
    }
}

/// Everything an order is created with. Id, status and timestamp are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub owner_id: Uuid,
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub vehicle: VehicleClass,
    pub item_type: ItemType,
    pub quantity: u32,
    pub weight_lb: f64,
    pub dimensions: Dimensions,
    pub weather: Weather,
    pub traffic: Traffic,
    pub price: f64,
    pub eta_minutes: u32,
    pub miles: f64,
    pub tier: Tier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub owner_id: Uuid,
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub vehicle: VehicleClass,
    pub item_type: ItemType,
    pub quantity: u32,
    pub weight_lb: f64,
    pub dimensions: Dimensions,
    pub weather: Weather,
    pub traffic: Traffic,
    pub price: f64,
    pub eta_minutes: u32,
    pub miles: f64,
    pub tier: Tier,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn from_new(id: u64, new: NewOrder, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: new.owner_id,
            pickup: new.pickup,
            dropoff: new.dropoff,
            vehicle: new.vehicle,
            item_type: new.item_type,
            quantity: new.quantity,
            weight_lb: new.weight_lb,
            dimensions: new.dimensions,
            weather: new.weather,
            traffic: new.traffic,
            price: new.price,
            eta_minutes: new.eta_minutes,
            miles: new.miles,
            tier: new.tier,
            status: OrderStatus::Pending,
            created_at,
        }
    }
}
