use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::order::{NewOrder, Order, OrderStatus};

/// Decides the next status for an order while the store holds its lock.
pub type TransitionFn<'a> = dyn Fn(&Order) -> Result<OrderStatus, AppError> + 'a;

/// Persistence boundary for orders.
pub trait OrderStore: Send + Sync {
    fn create_order(&self, new: NewOrder) -> Order;

    fn get_order(&self, id: u64) -> Option<Order>;

    /// Unconditional status write; returns `None` for an unknown id.
    fn update_order_status(&self, id: u64, status: OrderStatus) -> Option<Order>;

    /// Orders owned by `user_id`, newest first.
    fn list_orders_for_user(&self, user_id: Uuid) -> Vec<Order>;

    /// Atomic check-then-set of `status`. `decide` sees the current order and
    /// returns the status to commit; an error leaves the order untouched.
    /// Updates to different orders do not serialize on each other.
    fn transition(&self, id: u64, decide: &TransitionFn<'_>) -> Result<Order, AppError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct InMemoryOrderStore {
    orders: DashMap<u64, Order>,
    next_id: AtomicU64,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn create_order(&self, new: NewOrder) -> Order {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let order = Order::from_new(id, new, Utc::now());
        self.orders.insert(id, order.clone());
        order
    }

    fn get_order(&self, id: u64) -> Option<Order> {
        self.orders.get(&id).map(|entry| entry.value().clone())
    }

    fn update_order_status(&self, id: u64, status: OrderStatus) -> Option<Order> {
        let mut order = self.orders.get_mut(&id)?;
        order.status = status;
        Some(order.clone())
    }

    fn list_orders_for_user(&self, user_id: Uuid) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.value().owner_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        orders
    }

    fn transition(&self, id: u64, decide: &TransitionFn<'_>) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        let next = decide(order.value())?;
        order.status = next;

        Ok(order.clone())
    }

    fn len(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::location::GeoPoint;
    use crate::models::quote::{Dimensions, ItemType, Tier, Traffic, VehicleClass, Weather};

    fn new_order(owner_id: Uuid) -> NewOrder {
        NewOrder {
            owner_id,
            pickup: GeoPoint { lat: 52.51, lng: 13.39 },
            dropoff: GeoPoint { lat: 52.54, lng: 13.42 },
            vehicle: VehicleClass::Van,
            item_type: ItemType::Oversize,
            quantity: 2,
            weight_lb: 40.0,
            dimensions: Dimensions::default(),
            weather: Weather::Snow,
            traffic: Traffic::High,
            price: 42.0,
            eta_minutes: 31,
            miles: 3.1,
            tier: Tier::Priority,
        }
    }

    #[test]
    fn new_orders_start_pending_with_increasing_ids() {
        let store = InMemoryOrderStore::new();
        let owner = Uuid::new_v4();

        let first = store.create_order(new_order(owner));
        let second = store.create_order(new_order(owner));

        assert_eq!(first.status, OrderStatus::Pending);
        assert!(second.id > first.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn listing_is_newest_first_and_scoped_to_owner() {
        let store = InMemoryOrderStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let a = store.create_order(new_order(owner));
        store.create_order(new_order(other));
        let b = store.create_order(new_order(owner));
        let c = store.create_order(new_order(owner));

        let ids: Vec<u64> = store
            .list_orders_for_user(owner)
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
        assert!(store.list_orders_for_user(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn update_order_status_on_unknown_id_is_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.update_order_status(99, OrderStatus::Canceled).is_none());
    }

    #[test]
    fn update_order_status_changes_only_status() {
        let store = InMemoryOrderStore::new();
        let created = store.create_order(new_order(Uuid::new_v4()));

        let updated = store
            .update_order_status(created.id, OrderStatus::Assigned)
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Assigned);
        assert_eq!(updated.price, created.price);
        assert_eq!(updated.eta_minutes, created.eta_minutes);
        assert_eq!(updated.owner_id, created.owner_id);
    }

    #[test]
    fn failed_transition_does_not_write() {
        let store = InMemoryOrderStore::new();
        let created = store.create_order(new_order(Uuid::new_v4()));

        let result = store.transition(
            created.id,
            &|_order: &Order| -> Result<OrderStatus, AppError> {
                Err(AppError::Conflict("nope".to_string()))
            },
        );

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(
            store.get_order(created.id).unwrap().status,
            OrderStatus::Pending
        );
    }

    #[test]
    fn transition_on_unknown_id_is_not_found() {
        let store = InMemoryOrderStore::new();
        let result = store.transition(1, &|_order: &Order| -> Result<OrderStatus, AppError> {
            Ok(OrderStatus::Assigned)
        });
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
