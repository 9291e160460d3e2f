use rayon::ThreadPoolBuilder;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::data::Universe;
use crate::enrichment::{EnrichmentResult, WorkItem};
use crate::error::Result;

/// Evaluate every work item on a worker pool and wait for all of them.
///
/// With `threads == None` the global pool (one worker per core) is used, otherwise a
/// dedicated pool of that size. Items share nothing but the read-only universe. The first
/// failing item aborts the batch; no partial result set is returned. Result order is not
/// part of the contract.
pub fn dispatch(
    items: &[WorkItem<'_>],
    universe: &Universe<'_>,
    threads: Option<usize>,
) -> Result<Vec<EnrichmentResult>> {
    let run = || {
        items
            .par_iter()
            .map(|item| item.evaluate(universe))
            .collect::<Result<Vec<_>>>()
    };

    match threads {
        Some(n) => {
            let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
            pool.install(run)
        }
        None => run(),
    }
}
