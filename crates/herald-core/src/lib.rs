//! herald-core
//!
//! Marketing task orchestration and multi-platform publishing.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, content, task, payload, output, roadmap, region, publish）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, ContentGenerator, TrendSource, PlatformAdapter）
//! - **workers**: 9 種類のワーカーと自己修復ループ
//! - **supervisor**: タスクキュー、ワーカーへの委譲、ロードマップ、War Room
//! - **publishing**: 配信キュー、プラットフォーム別ディスパッチ、定期処理ループ
//! - **platforms**: Twitter / VK / WeChat アダプタ、OAuth 1.0a 署名、スレッド分割
//! - **config**: TOML 設定と環境変数によるクレデンシャル上書き
//! - **error**: 境界ごとのエラー型

pub mod config;
pub mod domain;
pub mod error;
pub mod platforms;
pub mod ports;
pub mod publishing;
pub mod supervisor;
pub mod workers;

#[cfg(test)]
mod test_support;

pub use config::HeraldConfig;
pub use error::{HeraldError, PlatformError, WorkerError};
pub use publishing::{PublisherLoop, PublishingQueue};
pub use supervisor::{Supervisor, SupervisorBuilder};
