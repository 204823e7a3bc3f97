pub mod orders;
pub mod rewards;

pub use orders::{InMemoryOrderStore, OrderStore};
pub use rewards::RewardLedger;
