//! Ordered fallback over alternative sources

use std::future::Future;

/// Try each source in order and return the first successful result.
///
/// Sources are attempted sequentially; a later source is only tried after
/// every earlier one has failed. Returns `None` when all fail or the list
/// is empty. Failures are reported through `on_error` with the source's
/// position.
pub async fn first_success<S, T, E, F, Fut>(
    sources: impl IntoIterator<Item = S>,
    mut attempt: F,
    mut on_error: impl FnMut(usize, E),
) -> Option<T>
where
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    for (index, source) in sources.into_iter().enumerate() {
        match attempt(source).await {
            Ok(value) => return Some(value),
            Err(err) => on_error(index, err),
        }
    }
    None
}
