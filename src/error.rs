use thiserror::Error;

use crate::types::NodeId;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("malformed markup: {reason}")]
    MalformedMarkup { reason: String },

    #[error("invalid mount point {0}: container is missing or not attached to the document")]
    InvalidMountPoint(NodeId),

    #[error("anchor {anchor} is not a child of container {container}")]
    MissingAnchor { anchor: NodeId, container: NodeId },

    #[error("replace target {0} is not attached to a parent")]
    DetachedReplaceTarget(NodeId),

    #[error("page skeleton has no `.{0}` element")]
    MissingMount(String),

    #[error("two waypoints share the id {0:?}")]
    DuplicatePointId(String),

    #[error("waypoint {id} ends before it starts")]
    InvalidDateRange { id: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BoardError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMarkup {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
