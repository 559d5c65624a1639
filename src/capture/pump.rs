//! Bridge from a blocking capture handle to the async capture loop.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::FrameSource;
use crate::domain::CapturedFrame;
use crate::error::CaptureError;

/// Frames buffered between the capture thread and the loop.
pub const PUMP_CAPACITY: usize = 1024;

/// What the pump hands to the capture loop.
pub type FrameEvent = Result<CapturedFrame, CaptureError>;

/// Move `source` onto a blocking thread and forward its frames.
///
/// The pump stops when the receiver is dropped or the source reports a
/// terminal error (which is forwarded first). The source is dropped, and
/// its capture handle released, before the returned task completes.
pub fn spawn_pump(
    mut source: Box<dyn FrameSource>,
    capacity: usize,
) -> (mpsc::Receiver<FrameEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(capacity);

    let handle = tokio::task::spawn_blocking(move || {
        let name = source.interface_name().to_string();
        debug!("Capture pump started on {}", name);

        while !tx.is_closed() {
            match source.next_frame() {
                Ok(Some(frame)) => {
                    if tx.blocking_send(Ok(frame)).is_err() {
                        break;
                    }
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!("Capture on {} failed: {}", name, e);
                    let _ = tx.blocking_send(Err(e));
                    break;
                }
            }
        }

        drop(source);
        debug!("Capture pump on {} stopped", name);
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct ScriptedSource {
        frames: VecDeque<Result<Option<CapturedFrame>, CaptureError>>,
        released: Arc<AtomicBool>,
    }

    impl FrameSource for ScriptedSource {
        fn next_frame(&mut self) -> Result<Option<CapturedFrame>, CaptureError> {
            match self.frames.pop_front() {
                Some(next) => next,
                None => {
                    std::thread::sleep(Duration::from_millis(5));
                    Ok(None)
                }
            }
        }

        fn interface_name(&self) -> &str {
            "test0"
        }
    }

    impl Drop for ScriptedSource {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    fn source(
        frames: Vec<Result<Option<CapturedFrame>, CaptureError>>,
    ) -> (Box<dyn FrameSource>, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        let source = ScriptedSource {
            frames: frames.into(),
            released: released.clone(),
        };
        (Box::new(source), released)
    }

    #[tokio::test]
    async fn test_forwards_frames_in_order() {
        let (src, _released) = source(vec![
            Ok(Some(CapturedFrame::new(vec![1]))),
            Ok(None),
            Ok(Some(CapturedFrame::new(vec![2]))),
        ]);
        let (mut rx, handle) = spawn_pump(src, 4);

        assert_eq!(rx.recv().await.unwrap().unwrap().bytes(), &[1]);
        assert_eq!(rx.recv().await.unwrap().unwrap().bytes(), &[2]);

        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_releases_source_when_receiver_dropped() {
        let (src, released) = source(Vec::new());
        let (rx, handle) = spawn_pump(src, 4);

        drop(rx);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("pump did not stop")
            .unwrap();
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_forwards_terminal_error_then_stops() {
        let (src, released) = source(vec![
            Ok(Some(CapturedFrame::new(vec![1]))),
            Err(CaptureError::Io(std::io::Error::other("device removed"))),
            Ok(Some(CapturedFrame::new(vec![2]))),
        ]);
        let (mut rx, handle) = spawn_pump(src, 4);

        assert!(rx.recv().await.unwrap().is_ok());
        assert!(matches!(rx.recv().await, Some(Err(CaptureError::Io(_)))));
        assert!(rx.recv().await.is_none());

        handle.await.unwrap();
        assert!(released.load(Ordering::SeqCst));
    }
}
