//! Domain model.
//!
//! - **ids**: ULID ベースの型付き ID
//! - **task** / **payload** / **output**: Supervisor task とワーカー入出力
//! - **content**: 生成されたコンテンツ
//! - **roadmap** / **region**: 計画と地域コンテキスト
//! - **publish**: 配信タスクとプラットフォーム結果

pub mod content;
pub mod ids;
pub mod output;
pub mod payload;
pub mod publish;
pub mod region;
pub mod roadmap;
pub mod task;

pub use content::{ContentItem, ContentKind, ContentStatus, Metadata};
pub use ids::{ContentId, Id, IdMarker, InvalidId, PublishTaskId, TaskId};
pub use output::WorkerOutput;
pub use payload::{GenerationPayload, WorkerPayload};
pub use publish::{Platform, PublishOutcome, PublishStatus, PublishTask};
pub use roadmap::{RoadmapPlan, RoadmapRamp, TopicPillar};
pub use task::{Priority, Task, TaskStatus, WorkerKind};
