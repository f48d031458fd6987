//! Debounced search worker.
//!
//! Keystrokes land faster than Zendesk answers. A single worker thread
//! drains a channel with `recv_timeout`: every new submission restarts the
//! debounce window, so only the last keystroke in a burst settles into a
//! request (~500 ms by default, configurable from preferences).
//!
//! Each submission carries a monotonically increasing generation stamp, and
//! a completed search is delivered only while its generation is still
//! current. A slow response for an old query therefore can never clobber
//! the results of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace};

use crate::client::ZendeskClient;
use crate::error::Result;
use crate::search::{self, SearchItem, SearchType, TicketFilters};
use crate::session::SessionCache;

/// One search the palette wants run.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub search_type: SearchType,
    pub query: String,
    /// Only meaningful for ticket search
    pub filters: Option<TicketFilters>,
}

/// Outcome of a settled search, delivered to the host's callback. On `Err`
/// the host shows the failure toast and resets the view to an empty list.
pub struct SearchUpdate {
    pub generation: u64,
    pub search_type: SearchType,
    pub query: String,
    pub result: Result<Vec<SearchItem>>,
}

/// Callback invoked on the worker thread for each settled search.
pub type SearchCallback = Arc<dyn Fn(SearchUpdate) + Send + Sync>;

type SearchFn = Arc<dyn Fn(&SearchRequest) -> Result<Vec<SearchItem>> + Send + Sync>;

struct Job {
    generation: u64,
    request: SearchRequest,
}

pub struct SearchDebouncer {
    tx: Option<Sender<Job>>,
    generation: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    /// Spawn the worker wired to the real dispatch.
    pub fn spawn(
        client: Arc<ZendeskClient>,
        cache: Arc<SessionCache>,
        delay: Duration,
        on_update: SearchCallback,
    ) -> Self {
        let search_fn: SearchFn = Arc::new(move |request: &SearchRequest| {
            search::dispatch(
                &client,
                &cache,
                request.search_type,
                &request.query,
                request.filters.as_ref(),
            )
        });
        Self::spawn_with(search_fn, delay, on_update)
    }

    /// Spawn with an injected search function. Used by [`spawn`] and by
    /// tests that must not touch the network.
    pub fn spawn_with(search_fn: SearchFn, delay: Duration, on_update: SearchCallback) -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let generation = Arc::new(AtomicU64::new(0));
        let current = generation.clone();

        let worker = thread::spawn(move || {
            'outer: while let Ok(mut job) = rx.recv() {
                // Debounce: keep replacing the pending job while newer
                // submissions arrive within the window.
                loop {
                    match rx.recv_timeout(delay) {
                        Ok(newer) => job = newer,
                        Err(RecvTimeoutError::Timeout) => break,
                        Err(RecvTimeoutError::Disconnected) => break 'outer,
                    }
                }

                if current.load(Ordering::SeqCst) != job.generation {
                    trace!(generation = job.generation, "Skipping stale job before search");
                    continue;
                }

                debug!(
                    search_type = job.request.search_type.label(),
                    generation = job.generation,
                    "Debounce settled, searching"
                );
                let result = search_fn(&job.request);

                // Deliver only while this generation is still the newest.
                if current.load(Ordering::SeqCst) == job.generation {
                    on_update(SearchUpdate {
                        generation: job.generation,
                        search_type: job.request.search_type,
                        query: job.request.query,
                        result,
                    });
                } else {
                    trace!(generation = job.generation, "Dropping stale search result");
                }
            }
        });

        SearchDebouncer {
            tx: Some(tx),
            generation,
            worker: Some(worker),
        }
    }

    /// Queue a search. Returns the generation stamp assigned to it.
    pub fn submit(&self, request: SearchRequest) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(tx) = &self.tx {
            // Send fails only if the worker is gone, which only happens
            // during shutdown.
            let _ = tx.send(Job {
                generation,
                request,
            });
        }
        generation
    }

    /// Generation of the most recent submission.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            search_type: SearchType::Groups,
            query: query.to_string(),
            filters: None,
        }
    }

    fn collecting_debouncer(
        delay: Duration,
        search_delay: Duration,
    ) -> (SearchDebouncer, Arc<Mutex<Vec<(u64, String)>>>) {
        let delivered: Arc<Mutex<Vec<(u64, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = delivered.clone();

        let search_fn: SearchFn = Arc::new(move |_req| {
            if !search_delay.is_zero() {
                thread::sleep(search_delay);
            }
            Ok(Vec::new())
        });
        let on_update: SearchCallback = Arc::new(move |update: SearchUpdate| {
            sink.lock().push((update.generation, update.query));
        });

        (
            SearchDebouncer::spawn_with(search_fn, delay, on_update),
            delivered,
        )
    }

    #[test]
    fn test_rapid_submissions_coalesce_to_the_last() {
        let (debouncer, delivered) =
            collecting_debouncer(Duration::from_millis(100), Duration::ZERO);

        for q in ["p", "pr", "pri", "prin", "print"] {
            debouncer.submit(request(q));
        }

        thread::sleep(Duration::from_millis(400));
        let delivered = delivered.lock();
        assert_eq!(delivered.len(), 1, "burst should settle into one search");
        assert_eq!(delivered[0].1, "print");
        assert_eq!(delivered[0].0, 5);
    }

    #[test]
    fn test_stale_result_is_dropped() {
        // Slow search: the first job settles and starts searching, then a
        // newer submission bumps the generation before it completes.
        let (debouncer, delivered) =
            collecting_debouncer(Duration::from_millis(20), Duration::from_millis(150));

        debouncer.submit(request("old"));
        thread::sleep(Duration::from_millis(80)); // let "old" settle and start
        debouncer.submit(request("new"));

        thread::sleep(Duration::from_millis(500));
        let delivered = delivered.lock();
        assert_eq!(delivered.len(), 1, "stale result must not be delivered");
        assert_eq!(delivered[0].1, "new");
    }

    #[test]
    fn test_generation_is_monotonic() {
        let (debouncer, _delivered) = collecting_debouncer(Duration::from_millis(5), Duration::ZERO);
        let first = debouncer.submit(request("a"));
        let second = debouncer.submit(request("b"));
        assert!(second > first);
        assert_eq!(debouncer.current_generation(), second);
    }

    #[test]
    fn test_drop_stops_the_worker() {
        let (debouncer, delivered) = collecting_debouncer(Duration::from_millis(10), Duration::ZERO);
        debouncer.submit(request("q"));
        drop(debouncer); // joins the worker without hanging
        // Whatever was in flight either delivered or didn't; the point is
        // that drop returns.
        let _ = delivered.lock().len();
    }
}
