//! ID の採番
//!
//! 実装は ULID を 1 つ返すだけでよく、型付き ID への変換はトレイト側で行います。

use ulid::Ulid;

use crate::domain::ids::{ContentId, Id, IdMarker, PublishTaskId, TaskId};
use crate::ports::Clock;

/// Shared by the supervisor, the workers and the publishing queue.
pub trait IdGenerator: Send + Sync {
    fn next_ulid(&self) -> Ulid;

    fn next_id<T: IdMarker>(&self) -> Id<T>
    where
        Self: Sized,
    {
        Id::from_ulid(self.next_ulid())
    }

    fn task_id(&self) -> TaskId {
        TaskId::from(self.next_ulid())
    }

    fn content_id(&self) -> ContentId {
        ContentId::from(self.next_ulid())
    }

    fn publish_task_id(&self) -> PublishTaskId {
        PublishTaskId::from(self.next_ulid())
    }
}

/// Timestamp from the injected clock, random low bits.
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn next_ulid(&self) -> Ulid {
        // pre-epoch clocks clamp to zero
        let millis = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or_default();
        Ulid::from_parts(millis, rand::random())
    }
}
