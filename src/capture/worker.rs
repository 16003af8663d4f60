//! 录制线程：摄像头句柄归该线程所有，随线程结束释放

use super::error::CaptureError;
use super::recorder::{CaptureBackend, CaptureOutcome, ClipRecorder};
use crate::core::Label;
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    pub label: Label,
}

#[derive(Debug)]
pub struct CaptureReply {
    pub label: Label,
    pub result: Result<CaptureOutcome, CaptureError>,
}

/// The capture the thread is running, with a cancel flag of its own.
struct ActiveCapture {
    label: Label,
    cancel: Arc<AtomicBool>,
}

#[derive(Clone, Default)]
struct ActiveSlot(Arc<Mutex<Option<ActiveCapture>>>);

impl ActiveSlot {
    fn lock(&self) -> MutexGuard<'_, Option<ActiveCapture>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, label: Label) -> Arc<AtomicBool> {
        let cancel = Arc::new(AtomicBool::new(false));
        *self.lock() = Some(ActiveCapture {
            label,
            cancel: Arc::clone(&cancel),
        });
        cancel
    }

    fn end(&self) {
        self.lock().take();
    }

    /// Raises the flag of the running capture when `matches` accepts its label.
    fn cancel_if(&self, matches: impl Fn(Label) -> bool) -> bool {
        match self.lock().as_ref() {
            Some(active) if matches(active.label) => {
                active.cancel.store(true, Ordering::SeqCst);
                true
            }
            _ => false,
        }
    }
}

pub struct RecorderHandle {
    requests: Option<Sender<CaptureRequest>>,
    replies: Receiver<CaptureReply>,
    active: ActiveSlot,
    closing: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl RecorderHandle {
    pub fn request(&self, label: Label) -> Result<(), CaptureError> {
        self.requests
            .as_ref()
            .ok_or(CaptureError::RecorderStopped)?
            .send(CaptureRequest { label })
            .map_err(|_| CaptureError::RecorderStopped)
    }

    /// Stops the capture of `label` if it is the one running. Returns false
    /// when that capture already returned or has not started yet.
    pub fn cancel(&self, label: Label) -> bool {
        self.active.cancel_if(|running| running == label)
    }

    pub fn try_reply(&self) -> Option<CaptureReply> {
        self.replies.try_recv().ok()
    }

    pub fn recv_reply(&self) -> Option<CaptureReply> {
        self.replies.recv().ok()
    }

    /// Closes the request channel and waits for the thread to release the cameras.
    pub fn shutdown(&mut self) {
        self.closing.store(true, Ordering::SeqCst);
        self.active.cancel_if(|_| true);
        drop(self.requests.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("❌ Recorder thread panicked");
            }
        }
    }
}

impl Drop for RecorderHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Moves `recorder` onto its own thread and serves requests in order.
pub fn spawn_recorder<B>(mut recorder: ClipRecorder<B>) -> RecorderHandle
where
    B: CaptureBackend + 'static,
{
    let (request_tx, request_rx) = mpsc::channel::<CaptureRequest>();
    let (reply_tx, reply_rx) = mpsc::channel::<CaptureReply>();
    let active = ActiveSlot::default();
    let worker_active = active.clone();
    let closing = Arc::new(AtomicBool::new(false));
    let worker_closing = Arc::clone(&closing);

    let thread = thread::spawn(move || {
        for request in request_rx {
            // Registered before the closing check so shutdown always sees it
            let cancel = worker_active.begin(request.label);
            if worker_closing.load(Ordering::SeqCst) {
                worker_active.end();
                info!("Dropping queued capture for '{}'", request.label);
                continue;
            }
            let result = recorder.capture(request.label, &cancel);
            worker_active.end();
            debug!("Capture for '{}' returned", request.label);
            if let Err(e) = &result {
                error!("❌ Capture for '{}' failed: {}", request.label, e);
            }
            let reply = CaptureReply {
                label: request.label,
                result,
            };
            if reply_tx.send(reply).is_err() {
                break;
            }
        }
        info!("🛑 Recorder thread exiting");
    });

    RecorderHandle {
        requests: Some(request_tx),
        replies: reply_rx,
        active,
        closing,
        thread: Some(thread),
    }
}
