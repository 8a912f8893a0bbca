/// progress of a network download.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadProgress {
    /// percent complete, when the payload size is known
    Percent(f64),
    /// bytes received so far, when it is not
    Bytes(u64),
}

impl LoadProgress {
    pub fn new(received: u64, total: Option<u64>) -> LoadProgress {
        match total {
            Some(t) if t > 0 => LoadProgress::Percent((received as f64 / t as f64 * 100.0).min(100.0)),
            _ => LoadProgress::Bytes(received),
        }
    }
}
