use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use geom::Duration;

const MIN_PERIOD: std::time::Duration = std::time::Duration::from_millis(1);

/// Calls `on_tick` on a background thread every `period` until stopped or dropped. The
/// callback shouldn't touch shared state; it's meant to post a message to whoever owns it.
pub struct Ticker {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Ticking ends early if `on_tick` returns false, like when the receiving end is gone.
    pub fn start<F: FnMut() -> bool + Send + 'static>(period: Duration, mut on_tick: F) -> Self {
        // Out of range periods get clamped rather than panicking or spinning
        let period = std::time::Duration::try_from_secs_f64(period.inner_seconds())
            .unwrap_or(std::time::Duration::MAX)
            .max(MIN_PERIOD);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(period) {
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if !on_tick() {
                        debug!("Ticker receiver is gone, stopping");
                        break;
                    }
                }
                // Asked to stop, or the Ticker was dropped
                Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        });
        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Blocks until the background thread has exited; no ticks happen after this returns.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            // The thread may have already quit on its own
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
