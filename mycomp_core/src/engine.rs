use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{bounded, unbounded};

use crate::error::{Error, Result};

/// Worker count used when the caller does not choose one.
pub fn default_workers() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Run an indexed sequence of independent fallible jobs on a bounded worker
/// pool and deliver each result to `sink` in strict index order.
///
/// # Contract
/// - Jobs may *complete* in any order; `sink` observes index `i + 1` only
///   after index `i`, regardless of completion order.
/// - `jobs` is consumed lazily on a feeder thread and fed through a bounded
///   queue, so at most roughly `workers` jobs are materialized at once. An
///   item of `Err` aborts the run (a failed chunk read, for instance).
/// - The first failure, whether from a job, the producer, or the sink, sets a
///   cancellation flag. Workers check it cooperatively and skip jobs that
///   have not started; jobs already running are ignored, and teardown does
///   not wait on anything beyond the normal pool join.
/// - On failure no partial result is reported as success. When several chunks
///   fail before shutdown completes, the failure with the smallest index
///   wins.
///
/// Results that arrive ahead of their turn are parked in a reorder buffer;
/// its size is bounded in practice by pool skew, not by the job count.
pub fn dispatch_ordered<I, F, T, S>(jobs: I, workers: usize, mut sink: S) -> Result<()>
where
    I: IntoIterator<Item = Result<F>>,
    I::IntoIter: Send,
    F: FnOnce() -> Result<T> + Send,
    T: Send,
    S: FnMut(u64, T) -> Result<()>,
{
    let workers = workers.max(1);
    let jobs = jobs.into_iter();
    let cancelled = AtomicBool::new(false);
    let (job_tx, job_rx) = bounded::<(u64, F)>(workers);
    let (result_tx, result_rx) = unbounded::<(u64, Result<T>)>();

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let cancelled = &cancelled;
            scope.spawn(move || {
                while let Ok((index, job)) = job_rx.recv() {
                    if cancelled.load(Ordering::Relaxed) {
                        break;
                    }
                    let outcome = job();
                    if outcome.is_err() {
                        cancelled.store(true, Ordering::Relaxed);
                    }
                    if result_tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(result_tx);

        let feeder = {
            let cancelled = &cancelled;
            scope.spawn(move || {
                let mut fed = 0u64;
                for job in jobs {
                    if cancelled.load(Ordering::Relaxed) {
                        return (fed, None);
                    }
                    match job {
                        Ok(job) => {
                            if job_tx.send((fed, job)).is_err() {
                                return (fed, None);
                            }
                            fed += 1;
                        }
                        Err(err) => {
                            cancelled.store(true, Ordering::Relaxed);
                            return (fed, Some((fed, err)));
                        }
                    }
                }
                (fed, None)
            })
        };

        let mut next = 0u64;
        let mut pending: BTreeMap<u64, T> = BTreeMap::new();
        let mut failure: Option<(u64, Error)> = None;

        while let Ok((index, outcome)) = result_rx.recv() {
            match outcome {
                Ok(value) => {
                    if failure.is_some() {
                        continue;
                    }
                    pending.insert(index, value);
                    while let Some(value) = pending.remove(&next) {
                        if let Err(err) = sink(next, value) {
                            cancelled.store(true, Ordering::Relaxed);
                            record_failure(&mut failure, next, err);
                            pending.clear();
                            break;
                        }
                        next += 1;
                    }
                }
                Err(err) => {
                    cancelled.store(true, Ordering::Relaxed);
                    record_failure(&mut failure, index, err);
                    pending.clear();
                }
            }
        }

        let (fed, producer_failure) = match feeder.join() {
            Ok(outcome) => outcome,
            Err(_) => (
                next,
                Some((next, Error::Codec("chunk feeder thread panicked".into()))),
            ),
        };
        if let Some((index, err)) = producer_failure {
            record_failure(&mut failure, index, err);
        }
        if failure.is_none() && next != fed {
            failure = Some((
                next,
                Error::Codec("chunk worker exited without returning a result".into()),
            ));
        }

        match failure {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    })
}

fn record_failure(slot: &mut Option<(u64, Error)>, index: u64, err: Error) {
    match slot {
        Some((existing, _)) if *existing <= index => {}
        _ => *slot = Some((index, err)),
    }
}
