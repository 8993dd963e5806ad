use anyhow::Result;

/// Everything in weektally runs on one thread: the engine is synchronous and persistence is a
/// task on the same runtime.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
