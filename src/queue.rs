use std::thread;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Single-worker FIFO queue owned by one searcher.
///
/// Tasks complete in submission order, so a slow step can never be overtaken
/// by a faster one submitted after it. Dropping the queue closes the channel:
/// already-queued tasks drain, then the worker exits.
pub(crate) struct TaskQueue {
    tx: flume::Sender<Task>,
}

impl TaskQueue {
    pub(crate) fn new(name: &str) -> Self {
        let (tx, rx) = flume::unbounded::<Task>();
        let worker = thread::Builder::new()
            .name(format!("search-{name}"))
            .spawn(move || {
                for task in rx.iter() {
                    task();
                }
            });
        if let Err(err) = worker {
            log::error!("failed to spawn search worker {name:?}: {err}");
        }
        Self { tx }
    }

    /// Enqueue a task without blocking the caller.
    pub(crate) fn submit(&self, task: impl FnOnce() + Send + 'static) {
        let _ = self.tx.send(Box::new(task));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn tasks_complete_in_submission_order() {
        let queue = TaskQueue::new("order");
        let (tx, rx) = flume::unbounded();

        let slow = tx.clone();
        queue.submit(move || {
            thread::sleep(Duration::from_millis(50));
            slow.send("slow").unwrap();
        });
        queue.submit(move || tx.send("fast").unwrap());

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "slow");
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "fast");
    }

    #[test]
    fn queued_tasks_drain_after_drop() {
        let queue = TaskQueue::new("drain");
        let (tx, rx) = flume::unbounded();

        for i in 0..8 {
            let tx = tx.clone();
            queue.submit(move || tx.send(i).unwrap());
        }
        drop(queue);

        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(rx.recv_timeout(Duration::from_secs(5)).unwrap());
        }
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn submit_returns_while_worker_is_busy() {
        let queue = TaskQueue::new("busy");
        let (tx, rx) = flume::unbounded();

        queue.submit(|| thread::sleep(Duration::from_millis(50)));
        // The worker is still asleep; submitting more work must not wait for it.
        queue.submit(move || tx.send(()).unwrap());

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(()));
    }
}
