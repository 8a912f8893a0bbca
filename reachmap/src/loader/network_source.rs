use super::{LoadError, LoadProgress, NetworkDecoder};
use crate::config::ReachmapConfig;
use reachmap_core::model::TransitNetwork;
use std::io::Read;
use std::path::PathBuf;

const CHUNK_SIZE: usize = 64 * 1024;

/// where the network feed is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkSource {
    Url(String),
    Path(PathBuf),
}

impl NetworkSource {
    /// `http://` and `https://` locations are downloaded, anything else is a file.
    pub fn new(location: &str) -> NetworkSource {
        if location.starts_with("http://") || location.starts_with("https://") {
            NetworkSource::Url(location.to_string())
        } else {
            NetworkSource::Path(PathBuf::from(location))
        }
    }

    pub fn from_config(config: &ReachmapConfig) -> Result<NetworkSource, LoadError> {
        let url = config.network_url()?;
        Ok(NetworkSource::new(&url))
    }

    pub fn location(&self) -> String {
        match self {
            NetworkSource::Url(url) => url.clone(),
            NetworkSource::Path(path) => path.to_string_lossy().to_string(),
        }
    }

    /// reads the whole feed, reporting progress after every chunk.
    pub fn fetch(&self, on_progress: &mut dyn FnMut(LoadProgress)) -> Result<Vec<u8>, LoadError> {
        let location = self.location();
        log::info!("loading network from {location}");
        let read_error = |source: std::io::Error| LoadError::ReadError {
            location: location.clone(),
            source,
        };
        match self {
            NetworkSource::Url(url) => {
                let response = reqwest::blocking::get(url)
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| LoadError::FetchError {
                        location: location.clone(),
                        message: e.to_string(),
                    })?;
                let total = response.content_length();
                read_chunks(response, total, on_progress).map_err(read_error)
            }
            NetworkSource::Path(path) => {
                let file = std::fs::File::open(path).map_err(read_error)?;
                let total = file.metadata().ok().map(|m| m.len());
                read_chunks(file, total, on_progress).map_err(read_error)
            }
        }
    }
}

/// fetches, decodes and prepares the network. any failure is final.
///
/// # Arguments
///
/// * `source` - location of the feed
/// * `decoder` - turns the feed bytes into the raw schema
/// * `on_progress` - receives download progress
///
/// # Returns
///
/// * the network with its spatial index, ready to be shared
pub fn load_network(
    source: &NetworkSource,
    decoder: &dyn NetworkDecoder,
    on_progress: &mut dyn FnMut(LoadProgress),
) -> Result<TransitNetwork, LoadError> {
    let bytes = source.fetch(on_progress)?;
    let raw = decoder.decode(&bytes)?;
    let network = TransitNetwork::try_from(raw)?;
    log::info!(
        "loaded network '{}' with {} stations",
        network.city_id,
        network.stations().len()
    );
    Ok(network)
}

fn read_chunks<R: Read>(
    mut reader: R,
    total: Option<u64>,
    on_progress: &mut dyn FnMut(LoadProgress),
) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        bytes.extend_from_slice(&chunk[..n]);
        on_progress(LoadProgress::new(bytes.len() as u64, total));
    }
    Ok(bytes)
}
