use anyhow::Result;

/// Host runtime. Events are handled one after another, so a single thread is all the host needs.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
