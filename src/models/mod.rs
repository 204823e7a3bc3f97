pub mod identity;
pub mod location;
pub mod order;
pub mod quote;
pub mod reward;
