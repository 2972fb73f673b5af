//! Visualization sinks fed by the cooperative composition search.
//!
//! A sink receives one placement per tested model pose: the slot index of
//! the model pose, the candidate-applied pose, and whether that pose matched
//! a space pose. Sinks are pure side effects; the search ignores what they
//! do with the data.

use crate::types::RigidTransform;
use crossbeam_channel::Sender;
use serde::Serialize;

/// Receives intermediate candidate-applied poses.
pub trait PoseSink {
    fn place(&mut self, slot: usize, pose: &RigidTransform, active: bool);
}

/// One repositioning of a visual proxy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub slot: usize,
    pub pose: RigidTransform,
    pub active: bool,
}

/// Discards every placement.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl PoseSink for NullSink {
    fn place(&mut self, _slot: usize, _pose: &RigidTransform, _active: bool) {}
}

/// Records placements in order.
impl PoseSink for Vec<Placement> {
    fn place(&mut self, slot: usize, pose: &RigidTransform, active: bool) {
        self.push(Placement {
            slot,
            pose: *pose,
            active,
        });
    }
}

/// Forwards placements to an observer on another thread.
///
/// A disconnected receiver is ignored so a closed viewer never aborts the
/// search.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: Sender<Placement>,
}

impl ChannelSink {
    pub fn new(sender: Sender<Placement>) -> Self {
        Self { sender }
    }
}

impl PoseSink for ChannelSink {
    fn place(&mut self, slot: usize, pose: &RigidTransform, active: bool) {
        let _ = self.sender.send(Placement {
            slot,
            pose: *pose,
            active,
        });
    }
}
