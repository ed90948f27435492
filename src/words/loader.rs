use std::sync::Arc;
use std::thread;

use crate::session::SessionMode;
use crate::words::error::LoadError;
use crate::words::store::WordStore;
use crate::words::{LoadOptions, WordItem};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
    pub source_id: String,
    pub mode: SessionMode,
}

impl LoadRequest {
    pub fn options(&self) -> LoadOptions {
        LoadOptions {
            split_compound_source: self.mode == SessionMode::Exam,
        }
    }
}

#[derive(Debug)]
pub struct LoadedWords {
    pub request: LoadRequest,
    pub result: Result<Vec<WordItem>, LoadError>,
}

/// Hands out a generation per load request. Only the newest request's result
/// is accepted; anything older that completes later is stale.
#[derive(Debug, Default)]
pub struct LoadTracker {
    latest: u64,
    in_flight: bool,
}

impl LoadTracker {
    pub fn begin(&mut self, source_id: &str, mode: SessionMode) -> LoadRequest {
        self.latest += 1;
        self.in_flight = true;
        LoadRequest {
            generation: self.latest,
            source_id: source_id.to_string(),
            mode,
        }
    }

    pub fn accept(&mut self, loaded: &LoadedWords) -> bool {
        if !self.in_flight || loaded.request.generation != self.latest {
            tracing::debug!(
                generation = loaded.request.generation,
                latest = self.latest,
                source = %loaded.request.source_id,
                "discarding stale word load"
            );
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Abandon whatever is in flight; its result will be discarded on arrival.
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.in_flight = false;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }
}

/// Run the load on a worker thread and hand the result to `deliver`.
pub fn spawn_load<F>(store: Arc<WordStore>, request: LoadRequest, deliver: F)
where
    F: FnOnce(LoadedWords) + Send + 'static,
{
    thread::spawn(move || {
        let result = store.load_words(&request.source_id, request.options());
        deliver(LoadedWords { request, result });
    });
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    fn loaded(request: &LoadRequest) -> LoadedWords {
        LoadedWords {
            request: request.clone(),
            result: Ok(vec![WordItem::new(1, "a", "b")]),
        }
    }

    #[test]
    fn latest_request_is_accepted() {
        let mut tracker = LoadTracker::default();
        let request = tracker.begin("basics.json", SessionMode::Exam);
        assert!(tracker.is_loading());
        assert!(tracker.accept(&loaded(&request)));
        assert!(!tracker.is_loading());
    }

    #[test]
    fn superseded_request_is_discarded() {
        let mut tracker = LoadTracker::default();
        let first = tracker.begin("basics.json", SessionMode::Exam);
        let second = tracker.begin("verbs.json", SessionMode::Training);

        assert!(!tracker.accept(&loaded(&first)));
        assert!(tracker.is_loading());
        assert!(tracker.accept(&loaded(&second)));
    }

    #[test]
    fn duplicate_delivery_is_discarded() {
        let mut tracker = LoadTracker::default();
        let request = tracker.begin("basics.json", SessionMode::Exam);
        assert!(tracker.accept(&loaded(&request)));
        assert!(!tracker.accept(&loaded(&request)));
    }

    #[test]
    fn invalidated_request_is_discarded() {
        let mut tracker = LoadTracker::default();
        let request = tracker.begin("basics.json", SessionMode::Exam);
        tracker.invalidate();
        assert!(!tracker.is_loading());
        assert!(!tracker.accept(&loaded(&request)));
    }

    #[test]
    fn exam_loads_split_compound_sources() {
        let mut tracker = LoadTracker::default();
        assert!(tracker.begin("x", SessionMode::Exam).options().split_compound_source);
        assert!(!tracker.begin("x", SessionMode::Training).options().split_compound_source);
    }

    #[test]
    fn spawn_load_delivers_result() {
        let mut tracker = LoadTracker::default();
        let request = tracker.begin("basics.json", SessionMode::Training);
        let (tx, rx) = mpsc::channel();
        spawn_load(Arc::new(WordStore::bundled()), request, move |loaded| {
            let _ = tx.send(loaded);
        });
        let loaded = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(tracker.accept(&loaded));
        assert!(!loaded.result.unwrap().is_empty());
    }
}
