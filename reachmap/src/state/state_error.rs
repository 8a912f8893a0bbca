#[derive(thiserror::Error, Debug)]
pub enum StateTokenError {
    #[error("failure building {kind} token pattern '{pattern}': {message}")]
    PatternError {
        kind: &'static str,
        pattern: &'static str,
        message: String,
    },
}
