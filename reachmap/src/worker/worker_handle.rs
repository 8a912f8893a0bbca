use super::{TaskEnvelope, TaskId, WorkerError, WorkerMessage, WorkerRequest};
use crate::position::PositionId;
use crate::search::{ReachabilitySearch, SearchError, SearchReporter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc::UnboundedSender;

/// owner side of a background search thread. terminating (or dropping)
/// the handle stops the search at its next iteration and suppresses any
/// message it has not yet sent.
pub struct WorkerHandle {
    task: TaskId,
    cancelled: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn spawn(
        position: PositionId,
        task: TaskId,
        request: WorkerRequest,
        search: Arc<dyn ReachabilitySearch>,
        sender: UnboundedSender<TaskEnvelope>,
    ) -> Result<WorkerHandle, WorkerError> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut reporter = ChannelReporter {
            position,
            task,
            cancelled: cancelled.clone(),
            sender,
        };
        let thread = std::thread::Builder::new()
            .name(format!("reachmap-{position}-{task}"))
            .spawn(move || {
                let result = catch_unwind(AssertUnwindSafe(|| {
                    search.search(&request, &mut reporter)
                }));
                let message = match result {
                    Ok(Ok(r)) => WorkerMessage::Done {
                        station_map: r.station_map,
                        debug_map: r.debug_map,
                        count: r.count,
                    },
                    Ok(Err(SearchError::Cancelled)) => return,
                    Ok(Err(e)) => WorkerMessage::Error {
                        message: e.to_string(),
                    },
                    Err(_) => WorkerMessage::Error {
                        message: String::from("background search panicked"),
                    },
                };
                reporter.send(message);
            })?;
        Ok(WorkerHandle {
            task,
            cancelled,
            thread: Some(thread),
        })
    }

    pub fn task(&self) -> TaskId {
        self.task
    }

    pub fn is_terminated(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// stops the search without waiting for the thread to finish. safe to call repeatedly.
    pub fn terminate(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        // detach; the thread exits on its next cancellation check
        self.thread.take();
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.terminate();
    }
}

struct ChannelReporter {
    position: PositionId,
    task: TaskId,
    cancelled: Arc<AtomicBool>,
    sender: UnboundedSender<TaskEnvelope>,
}

impl ChannelReporter {
    fn send(&self, message: WorkerMessage) {
        if self.is_cancelled() {
            return;
        }
        let envelope = TaskEnvelope {
            position: self.position,
            task: self.task,
            message,
        };
        if self.sender.send(envelope).is_err() {
            log::debug!(
                "receiver for {} of position {} is gone, dropping message",
                self.task,
                self.position
            );
        }
    }
}

impl SearchReporter for ChannelReporter {
    fn working(&mut self, at: u64) {
        self.send(WorkerMessage::Working { at });
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::search::SearchResult;
    use reachmap_core::model::{LatLng, TransitNetwork};
    use std::sync::mpsc;
    use tokio::sync::mpsc::unbounded_channel;

    struct FixedSearch;

    impl ReachabilitySearch for FixedSearch {
        fn search(
            &self,
            _request: &WorkerRequest,
            reporter: &mut dyn SearchReporter,
        ) -> Result<SearchResult, SearchError> {
            reporter.working(5);
            reporter.working(10);
            Ok(SearchResult {
                station_map: [(0, 42)].into_iter().collect(),
                debug_map: None,
                count: 10,
            })
        }
    }

    struct FailingSearch;

    impl ReachabilitySearch for FailingSearch {
        fn search(
            &self,
            _request: &WorkerRequest,
            _reporter: &mut dyn SearchReporter,
        ) -> Result<SearchResult, SearchError> {
            Err(SearchError::InternalError(String::from("boom")))
        }
    }

    /// blocks until released, then reports and finishes
    struct GatedSearch {
        gate: std::sync::Mutex<mpsc::Receiver<()>>,
    }

    impl ReachabilitySearch for GatedSearch {
        fn search(
            &self,
            _request: &WorkerRequest,
            reporter: &mut dyn SearchReporter,
        ) -> Result<SearchResult, SearchError> {
            let gate = self
                .gate
                .lock()
                .map_err(|e| SearchError::InternalError(e.to_string()))?;
            gate.recv()
                .map_err(|e| SearchError::InternalError(e.to_string()))?;
            reporter.working(1);
            Ok(SearchResult::default())
        }
    }

    fn request() -> WorkerRequest {
        let network = Arc::new(
            TransitNetwork::try_from(r#"{"Stops": [{"Latitude": 1.0, "Longitude": 1.0}]}"#)
                .expect("test network should decode"),
        );
        WorkerRequest {
            origin: LatLng::new(1.0, 1.0),
            bounds: *network.bounds(),
            network,
            report_interval: 1,
            interval_key: String::from("1-6"),
            max_walk_time: 900,
            seconds_per_m: 1.2,
            search_radius: 1000.0,
            debug: false,
        }
    }

    #[test]
    fn test_worker_sends_progress_then_done() {
        let (tx, mut rx) = unbounded_channel();
        let _handle = WorkerHandle::spawn(
            PositionId(1),
            TaskId(3),
            request(),
            Arc::new(FixedSearch),
            tx,
        )
        .expect("spawn should succeed");
        let messages = (0..3)
            .map(|_| rx.blocking_recv().expect("worker sends three messages"))
            .collect::<Vec<_>>();
        assert!(messages
            .iter()
            .all(|m| m.position == PositionId(1) && m.task == TaskId(3)));
        assert_eq!(messages[0].message, WorkerMessage::Working { at: 5 });
        assert_eq!(messages[1].message, WorkerMessage::Working { at: 10 });
        assert!(matches!(
            &messages[2].message,
            WorkerMessage::Done { count: 10, .. }
        ));
    }

    #[test]
    fn test_worker_reports_errors() {
        let (tx, mut rx) = unbounded_channel();
        let _handle = WorkerHandle::spawn(
            PositionId(1),
            TaskId(0),
            request(),
            Arc::new(FailingSearch),
            tx,
        )
        .expect("spawn should succeed");
        let envelope = rx.blocking_recv().expect("worker sends an error");
        assert_eq!(
            envelope.message,
            WorkerMessage::Error {
                message: String::from("boom")
            }
        );
    }

    #[test]
    fn test_terminated_worker_sends_nothing() {
        let (gate_tx, gate_rx) = mpsc::channel();
        let (tx, mut rx) = unbounded_channel();
        let mut handle = WorkerHandle::spawn(
            PositionId(1),
            TaskId(0),
            request(),
            Arc::new(GatedSearch {
                gate: std::sync::Mutex::new(gate_rx),
            }),
            tx,
        )
        .expect("spawn should succeed");
        handle.terminate();
        handle.terminate();
        assert!(handle.is_terminated());
        gate_tx.send(()).expect("worker is waiting on the gate");
        // channel closes once the thread drops its sender
        assert!(rx.blocking_recv().is_none());
    }
}
