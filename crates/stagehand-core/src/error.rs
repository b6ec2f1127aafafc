use crate::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("scene {0:?} is not in the node tree")]
    MissingScene(NodeId),
    #[error("incoming scene {0:?} is already the running scene")]
    SameScene(NodeId),
    #[error("node {0:?} has a parent and cannot be used as a scene")]
    NotAScene(NodeId),
}

pub type Result<T> = std::result::Result<T, Error>;
