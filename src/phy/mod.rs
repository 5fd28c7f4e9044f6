//! Radio source/sink contract.
//!
//! Signal processing lives outside the core. A device delivers received
//! samples on its own private thread through a callback that carries only an
//! opaque [`Handle`]; [`bridge_callback`] resolves that handle through the
//! [`HandleTable`] and hands the samples back to the owning component with
//! `send_self`.

mod loopback;

pub use loopback::LoopbackRadio;

use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::sim::{Event, EventKind, Handle, HandleTable};

/// Event kind used for samples handed back by [`bridge_callback`].
pub const RECEIVE: EventKind = EventKind::Custom("phy.receive");

/// Complex baseband sample (I/Q).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    pub i: f32,
    pub q: f32,
}

impl Sample {
    pub fn new(i: f32, q: f32) -> Self {
        Self { i, q }
    }

    pub fn power(&self) -> f32 {
        self.i * self.i + self.q * self.q
    }
}

/// Payload of a [`RECEIVE`] event.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedSamples {
    pub samples: Vec<Sample>,
}

/// Receive callback: `(handle, sample_count, samples)`.
///
/// The handle plays the role of C-style userdata; it is the only link back to
/// the component that started the receive.
pub type RxCallback = Arc<dyn Fn(Handle, usize, &[Sample]) + Send + Sync>;

pub trait RadioDevice: Send {
    /// Starts asynchronous reception; `callback` runs on a device thread.
    fn start_receive(&mut self, callback: RxCallback, handle: Handle) -> io::Result<()>;

    /// Queues samples for transmission and returns how many were accepted.
    fn transmit_samples(&mut self, buffer: &[Sample]) -> usize;

    /// Flushes the current burst and returns how many samples it contained.
    fn finalize_transmit(&mut self) -> usize;
}

/// Callback that turns every received burst into a [`RECEIVE`] event on the
/// component registered under the callback's handle.
pub fn bridge_callback(handles: Arc<HandleTable>) -> RxCallback {
    Arc::new(move |h: Handle, count: usize, samples: &[Sample]| {
        let Some(owner) = handles.resolve(h) else {
            trace!(handle = %h, "no component for handle, dropping samples");
            return;
        };
        let ev = Event::new(
            owner.key().clone(),
            RECEIVE,
            ReceivedSamples {
                samples: samples[..count.min(samples.len())].to_vec(),
            },
        );
        owner.send_self(ev);
    })
}
