/// Compute-once helper over [`crate::db::Cache`].
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, stores its `Ok` value and returns it. Errors are returned
/// without being cached, so a failed computation is attempted again on the
/// next call.
///
/// Must be used inside a function or async block returning `AppResult`.
///
/// # Example
/// ```rust,ignore
/// let url: String = cached!(cache, CacheKey::Poster(title.clone()), async move {
///     resolve_poster(&title).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set(&$key, &value).await;
            Ok(value)
        }
    }};
}
