use tracing::{info, warn};

use crate::error::AppError;
use crate::models::identity::{Actor, Role};
use crate::models::order::{Order, OrderStatus};
use crate::store::OrderStore;

/// Legal next states, independent of who is asking.
pub fn allowed_next(current: OrderStatus) -> &'static [OrderStatus] {
    match current {
        OrderStatus::Pending => &[OrderStatus::Assigned, OrderStatus::Canceled],
        OrderStatus::Assigned => &[OrderStatus::PickedUp, OrderStatus::Canceled],
        OrderStatus::PickedUp => &[OrderStatus::Delivered],
        OrderStatus::Delivered | OrderStatus::Canceled => &[],
    }
}

pub fn can_transition(current: OrderStatus, next: OrderStatus) -> bool {
    allowed_next(current).contains(&next)
}

/// Decides whether `actor` may move `order` to `requested`. Role rules are
/// applied before the transition table.
pub fn authorize(actor: &Actor, order: &Order, requested: OrderStatus) -> Result<(), AppError> {
    let current = order.status;

    match actor.role {
        Role::Customer => {
            if order.owner_id != actor.user_id {
                return Err(AppError::Forbidden(format!(
                    "order {} does not belong to caller",
                    order.id
                )));
            }
            if requested != OrderStatus::Canceled {
                return Err(AppError::Forbidden(
                    "customers may only cancel orders".to_string(),
                ));
            }
            if !matches!(current, OrderStatus::Pending | OrderStatus::Assigned) {
                return Err(AppError::Conflict(format!("cannot cancel from {current}")));
            }
            Ok(())
        }
        Role::Courier | Role::Admin => {
            if current.is_terminal() {
                return Err(AppError::Conflict(format!(
                    "order {} is already {current}",
                    order.id
                )));
            }
            // cancellation is the escape hatch for any live order
            if requested == OrderStatus::Canceled || can_transition(current, requested) {
                Ok(())
            } else {
                Err(AppError::Conflict(format!(
                    "illegal transition {current} -> {requested}"
                )))
            }
        }
        Role::Merchant => Err(AppError::Forbidden(
            "merchants cannot change order status".to_string(),
        )),
    }
}

/// Applies a status change requested by `actor`. The read, the rule check and
/// the write happen under the store's per-order lock.
pub fn update_status(
    store: &dyn OrderStore,
    order_id: u64,
    requested: &str,
    actor: &Actor,
) -> Result<Order, AppError> {
    let result = store.transition(order_id, &|order: &Order| -> Result<OrderStatus, AppError> {
        let next: OrderStatus = requested.parse()?;
        authorize(actor, order, next)?;
        Ok(next)
    });

    match &result {
        Ok(order) => info!(
            order_id,
            user_id = %actor.user_id,
            role = %actor.role,
            status = %order.status,
            "order status updated"
        ),
        Err(err) => warn!(
            order_id,
            user_id = %actor.user_id,
            role = %actor.role,
            requested,
            error = %err,
            "order status update rejected"
        ),
    }

    result
}
