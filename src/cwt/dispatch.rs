//! Fan-out of independent per-scale work across worker threads
//!
//! The output buffer is split into disjoint column chunks, one per scale, so
//! workers never contend on writes. The caller blocks until every column is
//! done.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::error::{CwtError, Result};

/// Runs column jobs either inline (`thread_count == 1`) or on a dedicated
/// rayon pool with exactly `thread_count` threads.
pub struct ThreadDispatcher {
    threads: usize,
    pool: Option<ThreadPool>,
}

impl std::fmt::Debug for ThreadDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadDispatcher")
            .field("threads", &self.threads)
            .finish()
    }
}

impl ThreadDispatcher {
    /// The requested count is honoured as given, even above the number of
    /// available cores.
    pub fn new(thread_count: usize) -> Result<Self> {
        if thread_count == 0 {
            return Err(CwtError::invalid("thread_count", "must be >= 1, got 0"));
        }
        let pool = if thread_count > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(thread_count)
                .thread_name(|i| format!("cwt-worker-{}", i))
                .build()
                .map_err(|e| {
                    CwtError::ResourceExhausted(format!(
                        "failed to start {} worker threads: {}",
                        thread_count, e
                    ))
                })?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            threads: thread_count,
            pool,
        })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run `job` once per column of `output`
    ///
    /// `output` is split into consecutive chunks of `column_len` elements;
    /// `job(j, column, workspace)` fills column `j`. `init` builds one
    /// workspace per worker (rayon may create a few more than `threads`
    /// when it splits work). Columns are handed to workers in contiguous
    /// blocks. Completion order is unspecified; column order is not.
    ///
    /// Returns the first error any job reported.
    pub fn run<T, W, I, F>(&self, output: &mut [T], column_len: usize, init: I, job: F) -> Result<()>
    where
        T: Send,
        I: Fn() -> Result<W> + Sync + Send,
        F: Fn(usize, &mut [T], &mut W) -> Result<()> + Sync + Send,
    {
        if column_len == 0 || output.len() % column_len != 0 {
            return Err(CwtError::Fatal(format!(
                "output buffer of {} elements cannot be split into columns of {}",
                output.len(),
                column_len
            )));
        }
        let columns = output.len() / column_len;

        match &self.pool {
            None => {
                log::trace!("dispatching {} columns inline", columns);
                let mut workspace = init()?;
                for (j, column) in output.chunks_mut(column_len).enumerate() {
                    job(j, column, &mut workspace)?;
                }
                Ok(())
            }
            Some(pool) => {
                let block = columns.div_ceil(self.threads).max(1);
                log::trace!(
                    "dispatching {} columns over {} threads in blocks of {}",
                    columns,
                    self.threads,
                    block
                );
                pool.install(|| {
                    output
                        .par_chunks_mut(column_len)
                        .enumerate()
                        .with_min_len(block)
                        .try_for_each_init(&init, |workspace, (j, column)| match workspace {
                            Ok(ws) => job(j, column, ws),
                            Err(e) => Err(e.clone()),
                        })
                })
            }
        }
    }
}
