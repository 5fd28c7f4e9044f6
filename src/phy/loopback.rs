//! In-memory loopback device: every finalized burst is received back.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{debug, trace};

use super::{RadioDevice, RxCallback, Sample};
use crate::sim::Handle;

#[derive(Default)]
pub struct LoopbackRadio {
    burst: Vec<Sample>,
    tx: Option<Sender<Vec<Sample>>>,
    rx_thread: Option<JoinHandle<()>>,
}

impl LoopbackRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops reception and waits for the receive thread.
    pub fn stop(&mut self) {
        self.tx = None;
        if let Some(t) = self.rx_thread.take() {
            let _ = t.join();
        }
    }
}

impl RadioDevice for LoopbackRadio {
    fn start_receive(&mut self, callback: RxCallback, handle: Handle) -> io::Result<()> {
        if self.tx.is_some() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "receive already started",
            ));
        }
        let (tx, rx) = crossbeam_channel::unbounded::<Vec<Sample>>();
        let t = thread::Builder::new()
            .name(format!("loopback-rx-{handle}"))
            .spawn(move || {
                for burst in rx.iter() {
                    callback(handle, burst.len(), &burst);
                }
                trace!(%handle, "loopback rx thread exits");
            })?;
        self.tx = Some(tx);
        self.rx_thread = Some(t);
        debug!(%handle, "loopback receive started");
        Ok(())
    }

    fn transmit_samples(&mut self, buffer: &[Sample]) -> usize {
        self.burst.extend_from_slice(buffer);
        buffer.len()
    }

    fn finalize_transmit(&mut self) -> usize {
        let burst = std::mem::take(&mut self.burst);
        let sent = burst.len();
        match &self.tx {
            Some(tx) => {
                let _ = tx.send(burst);
            }
            None => trace!(sent, "no receiver, burst discarded"),
        }
        sent
    }
}

impl Drop for LoopbackRadio {
    fn drop(&mut self) {
        self.stop();
    }
}
