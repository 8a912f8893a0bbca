mod task_id;
mod worker_error;
mod worker_handle;
mod worker_launcher;
mod worker_message;
mod worker_request;

pub use task_id::TaskId;
pub use worker_error::WorkerError;
pub use worker_handle::WorkerHandle;
pub use worker_launcher::WorkerLauncher;
pub use worker_message::{TaskEnvelope, WorkerMessage};
pub use worker_request::WorkerRequest;
