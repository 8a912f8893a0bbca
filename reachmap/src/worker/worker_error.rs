#[derive(thiserror::Error, Debug)]
pub enum WorkerError {
    #[error("failure spawning background search thread: {0}")]
    SpawnError(#[from] std::io::Error),
}
