pub mod events;
pub mod registry;

pub use events::{TrackEvent, TrackEventKind};
pub use registry::{DeliveryError, Subscriber, SubscriberId, TrackingRegistry};
