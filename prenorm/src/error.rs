use thiserror::Error;

use crate::connection::{ConnectionId, NodeId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    // ----------------------- Configuration
    #[error("bad parameter `{name}`: {reason}")]
    BadParameter { name: &'static str, reason: String },
    #[error("bad state `{name}`: {reason}")]
    BadState { name: &'static str, reason: String },
    #[error("unknown receptor type {0}")]
    UnknownReceptorType(u32),

    // ----------------------- Topology consistency
    #[error("incoming connection {connection} targets node {found}, expected node {expected}")]
    InvalidIncomingConnection {
        connection: ConnectionId,
        expected: NodeId,
        found: NodeId,
    },
    #[error("node {node} refers to incoming connection {connection}, which does not exist")]
    MissingIncomingConnection {
        node: NodeId,
        connection: ConnectionId,
    },

    // ----------------------- Numerical degeneracy
    #[error("cannot normalize incoming weights of node {node} at step {step}: weight sum is {sum}")]
    DegenerateWeightSum { node: NodeId, step: u64, sum: f64 },

    // ----------------------- Preconditions
    #[error("event delay must be strictly positive, got {0} steps")]
    NonPositiveDelay(i64),
    #[error("delivery offset {offset} does not fit a delay line of {capacity} slots")]
    DelayOutOfRange { offset: u64, capacity: usize },
    #[error("invalid update range [{from}, {to}) for a minimum delay of {min_delay} steps")]
    InvalidStepRange { from: u64, to: u64, min_delay: u64 },
    #[error("node {0} has not been calibrated")]
    NotCalibrated(NodeId),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

impl Error {
    pub(crate) fn bad_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::BadParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn bad_state(name: &'static str, reason: impl Into<String>) -> Self {
        Self::BadState {
            name,
            reason: reason.into(),
        }
    }
}
