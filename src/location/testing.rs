use crate::domain::LocationError;
use crate::location::platform::{LocationPlatform, Reading, WatchOptions};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Feeds readings into the watches a [`FakePlatform`] hands out, per accuracy tier.
pub struct FakeFeed {
    pub high: UnboundedSender<Reading>,
    pub low: UnboundedSender<Reading>,
}

/// Platform double that records watch requests and counts the watches that have not been released yet.
#[derive(Debug)]
pub struct FakePlatform {
    supported: bool,
    high: Mutex<Option<UnboundedReceiver<Reading>>>,
    low: Mutex<Option<UnboundedReceiver<Reading>>>,
    requests: Mutex<Vec<WatchOptions>>,
    active: Arc<AtomicUsize>,
    overlapping: AtomicUsize,
}

struct WatchGuard(Arc<AtomicUsize>);

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakePlatform {
    pub fn new() -> (Arc<Self>, FakeFeed) {
        let (high_tx, high_rx) = mpsc::unbounded_channel();
        let (low_tx, low_rx) = mpsc::unbounded_channel();

        let platform = FakePlatform {
            supported: true,
            high: Mutex::new(Some(high_rx)),
            low: Mutex::new(Some(low_rx)),
            requests: Mutex::new(Vec::new()),
            active: Arc::new(AtomicUsize::new(0)),
            overlapping: AtomicUsize::new(0),
        };

        (Arc::new(platform), FakeFeed { high: high_tx, low: low_tx })
    }

    pub fn unsupported() -> Arc<Self> {
        Arc::new(FakePlatform {
            supported: false,
            high: Mutex::new(None),
            low: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            active: Arc::new(AtomicUsize::new(0)),
            overlapping: AtomicUsize::new(0),
        })
    }

    pub fn requests(&self) -> Vec<WatchOptions> {
        self.requests.lock().unwrap().clone()
    }

    pub fn active_watches(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Watches requested while an earlier one was still held.
    pub fn overlapping_watches(&self) -> usize {
        self.overlapping.load(Ordering::SeqCst)
    }
}

impl LocationPlatform for FakePlatform {
    fn watch_position(&self, options: WatchOptions) -> Result<BoxStream<'static, Reading>, LocationError> {
        if !self.supported {
            return Err(LocationError::Unsupported);
        }

        self.requests.lock().unwrap().push(options);
        if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlapping.fetch_add(1, Ordering::SeqCst);
        }
        let guard = WatchGuard(self.active.clone());

        let feed = if options.high_accuracy { &self.high } else { &self.low };
        let readings = match feed.lock().unwrap().take() {
            Some(rx) => UnboundedReceiverStream::new(rx).boxed(),
            None => stream::pending::<Reading>().boxed(),
        };

        Ok(readings
            .map(move |reading| {
                let _guard = &guard;
                reading
            })
            .boxed())
    }
}
