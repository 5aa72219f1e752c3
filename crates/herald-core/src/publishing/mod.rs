//! Publishing: the queue, per-platform dispatch and the background loop.

pub mod dispatch;
pub mod publisher_loop;
pub mod queue;
pub mod status;

pub use dispatch::AdapterRegistry;
pub use publisher_loop::PublisherLoop;
pub use queue::PublishingQueue;
pub use status::{QueueCounts, QueueStatus};
