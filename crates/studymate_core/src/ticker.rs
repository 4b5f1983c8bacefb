use crate::error::AppError;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Periodic tick source backed by one thread.
///
/// The thread lives exactly as long as the `Ticker`: dropping it wakes the
/// thread immediately and joins it, so no tick outlives its owner.
pub struct Ticker {
    ticks: Receiver<()>,
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(interval: Duration) -> Self {
        let (tick_tx, ticks) = mpsc::channel();
        let (cancel, cancel_rx) = mpsc::channel::<()>();

        let handle = std::thread::spawn(move || {
            loop {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tick_tx.send(()).is_err() {
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            ticks,
            cancel: Some(cancel),
            handle: Some(handle),
        }
    }

    /// Blocks until the next tick.
    pub fn wait(&self) -> Result<(), AppError> {
        self.ticks
            .recv()
            .map_err(|_| AppError::io("ticker thread stopped"))
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        drop(self.cancel.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
