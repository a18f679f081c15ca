//! Layer image loading bookkeeping.
//!
//! Every asset loads independently; success and failure both settle it. The
//! set of loaded images outlives a remount and is handed to the next tool
//! instance so the page does not fetch and flicker again.

use std::collections::BTreeMap;

/// Outcome reported once, when the last pending load settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub failed: usize,
}

impl LoadSummary {
    pub fn any_failed(&self) -> bool {
        self.failed > 0
    }

    pub fn all_failed(&self) -> bool {
        self.loaded == 0 && self.failed > 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadTracker {
    total: usize,
    loaded: usize,
    failed: usize,
}

impl LoadTracker {
    pub fn new(total: usize) -> Self {
        Self { total, loaded: 0, failed: 0 }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn settled(&self) -> usize {
        self.loaded + self.failed
    }

    pub fn is_started(&self) -> bool {
        self.total > 0
    }

    pub fn is_settled(&self) -> bool {
        self.is_started() && self.settled() >= self.total
    }

    /// The final tally, once every load has settled.
    pub fn summary(&self) -> Option<LoadSummary> {
        self.is_settled().then_some(LoadSummary {
            loaded: self.loaded,
            failed: self.failed,
        })
    }

    /// Records one settled load. Returns the summary exactly once, on the
    /// call that settles the last pending load; extra reports are ignored.
    pub fn record(&mut self, ok: bool) -> Option<LoadSummary> {
        if self.is_settled() || !self.is_started() {
            return None;
        }
        if ok {
            self.loaded += 1;
        } else {
            self.failed += 1;
        }
        self.summary()
    }
}

/// `Uninitialized → Loading → Ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolPhase {
    Uninitialized,
    Loading,
    Ready,
}

/// Decoded layer images keyed by asset number, plus their load progress.
#[derive(Debug)]
pub struct ImageSet<I> {
    images: BTreeMap<u8, I>,
    tracker: LoadTracker,
}

impl<I> Default for ImageSet<I> {
    fn default() -> Self {
        Self {
            images: BTreeMap::new(),
            tracker: LoadTracker::default(),
        }
    }
}

impl<I> ImageSet<I> {
    /// Marks `total` loads as in flight.
    pub fn begin(&mut self, total: usize) {
        self.images.clear();
        self.tracker = LoadTracker::new(total);
    }

    pub fn phase(&self) -> ToolPhase {
        if !self.tracker.is_started() {
            ToolPhase::Uninitialized
        } else if self.tracker.is_settled() {
            ToolPhase::Ready
        } else {
            ToolPhase::Loading
        }
    }

    pub fn tracker(&self) -> &LoadTracker {
        &self.tracker
    }

    pub fn record_loaded(&mut self, asset: u8, image: I) -> Option<LoadSummary> {
        if self.tracker.is_settled() {
            return None;
        }
        self.images.insert(asset, image);
        self.tracker.record(true)
    }

    pub fn record_failed(&mut self, _asset: u8) -> Option<LoadSummary> {
        self.tracker.record(false)
    }

    pub fn get(&self, asset: u8) -> Option<&I> {
        self.images.get(&asset)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Ready set built from already decoded images, e.g. for headless
    /// rendering. Missing assets count as failed loads.
    pub fn from_images(total: usize, images: impl IntoIterator<Item = (u8, I)>) -> Self {
        let mut set = Self::default();
        set.begin(total);
        for (asset, image) in images {
            set.record_loaded(asset, image);
        }
        while set.tracker.is_started() && !set.tracker.is_settled() {
            set.tracker.record(false);
        }
        set
    }
}
