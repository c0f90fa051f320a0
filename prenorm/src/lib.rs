//! # prenorm
//!
//! Izhikevich spiking unit with periodic normalization of its incoming weights.
//!
//! The unit integrates the two-variable Izhikevich oscillator with a fixed step,
//! collects delayed spike and current input in ring buffers, emits spikes on
//! threshold crossings and, every `norm_period` steps, rescales the weights of
//! the connections that target it so that they sum to `norm_value`.
//!
//! [`Network`] is a small sequential driver around it: it owns the units and
//! the connection store, runs delivery intervals and routes spikes.

pub mod archive;
pub mod connection;
pub mod error;
pub mod event;
pub mod network;
pub mod neuron;
pub mod params;
pub mod recorder;
pub mod render;
pub mod ring_buffer;
pub mod scheme;
pub mod state;
pub mod time;

pub use archive::{HistoryEntry, SpikeArchive};
pub use connection::{BackRefs, Connection, ConnectionId, ConnectionStore, ConnectionTable, NodeId};
pub use error::{Error, Result};
pub use event::{CurrentEvent, Emission, SpikeEvent, SpikeSink};
pub use network::{Network, SpikeRecord};
pub use neuron::{IzhikevichPrenorm, Status};
pub use params::{ParameterStatus, ParameterUpdate, Parameters};
pub use recorder::{DataLogger, DataLoggingRequest, Observables, Recordable, RecordingSpec, Sample};
pub use ring_buffer::RingBuffer;
pub use scheme::Integration;
pub use state::{State, StateUpdate};
pub use time::{KernelContext, Resolution};
