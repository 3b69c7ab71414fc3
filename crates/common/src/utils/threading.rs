use crossbeam_channel::unbounded;

use std::thread;

/// A simple thread pool implementation that takes a slice of items, splits them into chunks, and
/// processes each chunk in a separate scoped thread. Results are returned in the same order as
/// the input items, regardless of which thread finished first.
///
/// ```
/// use forseti_common::utils::threading::task_pool;
///
/// let items = vec![1, 2, 3, 4, 5];
/// let num_threads = 2;
/// let results = task_pool(&items, num_threads, |item| item * 2);
///
/// assert_eq!(results, vec![2, 4, 6, 8, 10]);
/// ```
pub fn task_pool<T, R, F>(items: &[T], num_threads: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    // if items is empty, return empty results
    if items.is_empty() {
        return Vec::new();
    }

    let (tx, rx) = unbounded();

    // Split items into chunks for each thread to process
    let chunk_size = items.len().div_ceil(num_threads.max(1));
    let shared_f = &f;

    thread::scope(|scope| {
        for (index, chunk) in items.chunks(chunk_size).enumerate() {
            let tx = tx.clone();
            scope.spawn(move || {
                let chunk_results: Vec<R> = chunk.iter().map(shared_f).collect();
                let _ = tx.send((index, chunk_results));
            });
        }
    });
    drop(tx);

    // every scoped thread has joined, so all chunks are buffered in the channel
    let mut chunks: Vec<(usize, Vec<R>)> = rx.try_iter().collect();
    chunks.sort_by_key(|(index, _)| *index);

    chunks.into_iter().flat_map(|(_, results)| results).collect()
}
