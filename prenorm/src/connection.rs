//! Connection storage and the narrow view of it a destination unit may use.
//!
//! Connections are owned by the [`ConnectionStore`]. A unit only keeps
//! [`ConnectionId`] handles to the connections that target it and reaches
//! them through the [`ConnectionTable`] trait: read the target and the weight,
//! write the weight. It never creates or removes connections.

use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub u32);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
    /// Transmission delay in steps, always >= 1.
    pub delay_steps: u64,
    pub receptor: u32,
}

/// What a destination unit is allowed to see of a connection it is referenced by.
pub trait ConnectionTable {
    fn target(&self, id: ConnectionId) -> Option<NodeId>;
    fn weight(&self, id: ConnectionId) -> Option<f64>;
    /// Returns `false` if `id` does not resolve to a connection.
    fn set_weight(&mut self, id: ConnectionId, weight: f64) -> bool;
}

/// Arena of connections addressed by [`ConnectionId`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionStore {
    connections: Vec<Connection>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, connection: Connection) -> Result<ConnectionId> {
        if connection.delay_steps == 0 {
            return Err(Error::NonPositiveDelay(0));
        }
        let id = ConnectionId(self.connections.len() as u32);
        self.connections.push(connection);
        Ok(id)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections
            .iter()
            .enumerate()
            .map(|(i, c)| (ConnectionId(i as u32), c))
    }
}

impl ConnectionTable for ConnectionStore {
    fn target(&self, id: ConnectionId) -> Option<NodeId> {
        self.get(id).map(|c| c.target)
    }

    fn weight(&self, id: ConnectionId) -> Option<f64> {
        self.get(id).map(|c| c.weight)
    }

    fn set_weight(&mut self, id: ConnectionId, weight: f64) -> bool {
        match self.get_mut(id) {
            Some(c) => {
                c.weight = weight;
                true
            }
            None => false,
        }
    }
}

/// Non-owning set of handles to the connections that target one unit.
///
/// Iteration follows registration order, so normalization visits connections
/// in the same order on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackRefs {
    ids: Vec<ConnectionId>,
}

impl BackRefs {
    /// Returns `false` if `id` was already registered.
    pub fn insert(&mut self, id: ConnectionId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: ConnectionId) -> bool {
        match self.ids.iter().position(|&i| i == id) {
            Some(pos) => {
                self.ids.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.ids.iter().copied()
    }
}
