//! Ports - 抽象化レイヤー
//!
//! 外部の協調者（時計、ID 生成、テキスト生成、トレンド取得、配信先）への
//! インターフェースを定義し、実装の詳細を隠蔽します。

pub mod clock;
pub mod generator;
pub mod id_generator;
pub mod platform;
pub mod trends;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::generator::{ContentGenerator, GeneratedContent, GenerationRequest, TemplateGenerator};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::platform::{PlatformAdapter, PublishReceipt};
pub use self::trends::{StaticTrendSource, TrendSource};
