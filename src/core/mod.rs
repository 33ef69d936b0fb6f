pub mod checkpoint;
mod error;
mod mutation;
mod read;
mod snapshot;
mod store;
mod volume;

pub use error::StoreError;
pub use mutation::BrokerMutation;
pub use read::ReadTargets;
pub use snapshot::Snapshot;
pub use store::TargetStore;
pub use volume::FileTargets;
