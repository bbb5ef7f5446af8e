//! # Pool de Workers
//! src/server/pool.rs
//!
//! Pool de tamaño fijo: N threads que sacan trabajos de una cola FIFO
//! compartida (Mutex + Condvar). La cola no tiene límite, así que si todos
//! los workers están ocupados las conexiones nuevas simplemente esperan.

use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Unidad de trabajo
type Job = Box<dyn FnOnce() + Send + 'static>;

/// Estado compartido entre el pool y sus workers
struct Shared {
    queue: Mutex<Queue>,
    condvar: Condvar,
}

struct Queue {
    jobs: VecDeque<Job>,
    shutting_down: bool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Queue> {
        // Los trabajos corren fuera del lock, un poison no deja la cola inconsistente
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pool de threads de tamaño fijo
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Crea el pool y arranca `size` workers
    ///
    /// Falla si el sistema no deja crear algún thread.
    pub fn new(size: usize) -> io::Result<Self> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                jobs: VecDeque::new(),
                shutting_down: false,
            }),
            condvar: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(size);
        for i in 0..size {
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("worker-{}", i))
                .spawn(move || Self::worker_loop(shared))?;
            workers.push(handle);
        }

        Ok(Self { shared, workers })
    }

    /// Encola un trabajo; lo tomará el primer worker libre
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut queue = self.shared.lock();
        queue.jobs.push_back(Box::new(job));
        self.shared.condvar.notify_one();
    }

    /// Cantidad de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Trabajos esperando un worker libre
    pub fn queued(&self) -> usize {
        self.shared.lock().jobs.len()
    }

    /// Loop principal del worker
    fn worker_loop(shared: Arc<Shared>) {
        loop {
            let job = {
                let mut queue = shared.lock();
                loop {
                    if let Some(job) = queue.jobs.pop_front() {
                        break job;
                    }
                    if queue.shutting_down {
                        debug!("worker exiting");
                        return;
                    }
                    queue = shared
                        .condvar
                        .wait(queue)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            };

            // Un panic en un trabajo no debe matar al worker
            if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                error!("job panicked; worker keeps running");
            }
        }
    }
}

impl Drop for WorkerPool {
    /// Termina los trabajos pendientes y espera a todos los workers
    fn drop(&mut self) {
        self.shared.lock().shutting_down = true;
        self.shared.condvar.notify_all();

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_runs_all_jobs() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(4).unwrap();
            for _ in 0..100 {
                let counter = Arc::clone(&counter);
                pool.execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
            // Drop espera a que se vacíe la cola
        }
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_size() {
        let pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.size(), 3);
    }

    #[test]
    fn test_jobs_run_concurrently() {
        let pool = WorkerPool::new(4).unwrap();
        let (tx, rx) = mpsc::channel();

        for _ in 0..4 {
            let tx = tx.clone();
            pool.execute(move || {
                thread::sleep(Duration::from_millis(50));
                tx.send(thread::current().name().map(str::to_string)).unwrap();
            });
        }

        let names: HashSet<_> = (0..4)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_saturated_pool_queues_jobs() {
        let pool = WorkerPool::new(1).unwrap();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel();

        pool.execute(move || {
            release_rx.recv().unwrap();
        });
        let done = done_tx.clone();
        pool.execute(move || done.send(1).unwrap());

        // El segundo trabajo espera en la cola mientras el primero bloquea
        assert!(done_rx.recv_timeout(Duration::from_millis(100)).is_err());

        release_tx.send(()).unwrap();
        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap(), 1);
    }

    #[test]
    fn test_panic_does_not_kill_worker() {
        let pool = WorkerPool::new(1).unwrap();
        let (tx, rx) = mpsc::channel();

        pool.execute(|| panic!("boom"));
        pool.execute(move || tx.send("still alive").unwrap());

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "still alive");
    }
}
