//! 型付き ID
//!
//! すべての ID は ULID を 1 つ包むだけですが、マーカー型で種類を区別するため
//! `TaskId` を `PublishTaskId` の代わりに渡すことはできません。
//!
//! - 先頭 48bit がミリ秒 timestamp なので、生成順に並ぶ
//! - 表示はプレフィックス付き（`task-01J...`）、JSON はプレフィックスなしの ULID 文字列

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

/// Kind of entity an [`Id`] points at.
pub trait IdMarker: Send + Sync + 'static {
    /// Display prefix, including the trailing dash.
    const PREFIX: &'static str;
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    kind: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            kind: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::PREFIX)?;
        fmt::Display::fmt(&self.ulid, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid id: {0}")]
pub struct InvalidId(pub String);

/// Accepts the display form (`task-<ulid>`) or a bare ULID.
impl<T: IdMarker> FromStr for Id<T> {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(T::PREFIX).unwrap_or(s);
        Ulid::from_string(raw)
            .map(Self::from_ulid)
            .map_err(|_| InvalidId(s.to_string()))
    }
}

macro_rules! id_marker {
    ($(#[$doc:meta])* $marker:ident => $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $marker {}

        impl IdMarker for $marker {
            const PREFIX: &'static str = $prefix;
        }
    };
}

id_marker!(
    /// Supervisor task.
    Task => "task-"
);
id_marker!(
    /// Generated content item.
    Content => "content-"
);
id_marker!(
    /// Publishing task (one item fanned out to N platforms).
    Publish => "publish-"
);

pub type TaskId = Id<Task>;
pub type ContentId = Id<Content>;
pub type PublishTaskId = Id<Publish>;
