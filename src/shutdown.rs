//! One-shot shutdown notification.
//!
//! A [`ShutdownSignal`] is fired once by whoever observes the interrupt;
//! the capture loop awaits it through a [`ShutdownListener`]. Firing again
//! is a no-op.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

/// Producer half of the shutdown notification.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

/// Consumer half of the shutdown notification.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

/// Create a connected signal/listener pair.
pub fn channel() -> (ShutdownSignal, ShutdownListener) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSignal { tx: Arc::new(tx) }, ShutdownListener { rx })
}

impl ShutdownSignal {
    /// Fire the signal.
    ///
    /// Returns `true` only for the call that actually fired it.
    pub fn fire(&self) -> bool {
        self.tx.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    /// Fire this signal on SIGINT or SIGTERM.
    pub fn install_os_handler(&self) -> Result<(), ctrlc::Error> {
        let signal = self.clone();
        ctrlc::set_handler(move || {
            if signal.fire() {
                info!("Received interrupt, shutting down");
            } else {
                debug!("Shutdown already requested");
            }
        })
    }
}

impl ShutdownListener {
    /// Wait until the signal fires.
    ///
    /// If every [`ShutdownSignal`] is dropped without firing, this never
    /// completes.
    pub async fn wait(&mut self) {
        if self.rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
