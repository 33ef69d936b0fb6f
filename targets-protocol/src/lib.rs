pub mod errors;
pub mod keys;
pub mod model;
pub mod ordered;

// Public re-exports for easy access
pub use errors::KeyError;
pub use keys::{broker_key, split_broker_key, split_target_key, target_key, KEY_SEPARATOR};
pub use model::{Broker, Queue, State, Target, TargetMap};
