use super::{App, CliError, TileRange};
use crate::app::{MapEvent, Reachmap, ReachmapError};
use crate::config::ReachmapConfig;
use crate::loader::{JsonNetworkDecoder, LoadError, LoadProgress, NetworkSource};
use crate::map::{HeadlessMap, MapSurface, TileCoord};
use crate::render::TileMask;
use crate::search::TransitDijkstra;
use itertools::Itertools;
use kdam::{tqdm, BarExt};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
struct PositionSummary {
    index: usize,
    time_budget: u64,
    lat: f64,
    lng: f64,
    status: String,
    reachable_stations: usize,
}

#[derive(Serialize)]
struct ReachSummary {
    positions: Vec<PositionSummary>,
    state: Vec<String>,
}

pub fn run(app: &App) -> Result<(), CliError> {
    match app {
        App::Reach {
            network,
            config,
            state,
            zoom,
            timeout,
        } => {
            let reachmap = restore(network.as_deref(), config.as_deref(), state, *zoom, *timeout)?;
            let summary = summarize(&reachmap);
            let output = serde_json::to_string_pretty(&summary)
                .map_err(|e| CliError::SerializationError(e.to_string()))?;
            println!("{output}");
            Ok(())
        }
        App::Render {
            network,
            config,
            state,
            zoom,
            tiles,
            output_directory,
            timeout,
        } => {
            let range = TileRange::from_str(tiles)?;
            let reachmap = restore(
                network.as_deref(),
                config.as_deref(),
                state,
                *zoom as f64,
                *timeout,
            )?;
            render_tiles(&reachmap, &range.tiles(*zoom), Path::new(output_directory))
        }
        App::Config { config } => {
            let conf = ReachmapConfig::from_sources(config.as_deref())?;
            let output = toml::to_string_pretty(&conf)
                .map_err(|e| CliError::SerializationError(e.to_string()))?;
            println!("{output}");
            Ok(())
        }
    }
}

/// loads the network and restores positions from view state tokens, then
/// waits for their searches.
fn restore(
    network: Option<&str>,
    config_file: Option<&str>,
    state: &str,
    zoom: f64,
    timeout: u64,
) -> Result<Reachmap<HeadlessMap>, CliError> {
    let conf = ReachmapConfig::from_sources(config_file)?;
    let source = network_source(network, &conf).map_err(ReachmapError::from)?;
    let mut reachmap = Reachmap::new(conf, HeadlessMap::new(zoom), Arc::new(TransitDijkstra))?;

    let mut bar = tqdm!(total = 100, desc = "loading network");
    let mut on_progress = |progress: LoadProgress| {
        let _ = match progress {
            LoadProgress::Percent(p) => bar.update_to(p.floor() as usize),
            LoadProgress::Bytes(_) => bar.update(0),
        };
    };
    reachmap.load(&source, &JsonNetworkDecoder, &mut on_progress)?;
    eprintln!();

    let tokens = state
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect_vec();
    reachmap.handle_event(MapEvent::ViewStateInit(tokens))?;
    log::info!(
        "restored {} positions, waiting for their searches",
        reachmap.positions().len()
    );
    if !reachmap.wait_for_results(Duration::from_secs(timeout))? {
        log::warn!("not every search finished within {timeout} seconds");
    }
    Ok(reachmap)
}

/// an explicit `--network` wins over the feed location of the configuration.
fn network_source(
    network: Option<&str>,
    conf: &ReachmapConfig,
) -> Result<NetworkSource, LoadError> {
    match network {
        Some(location) => Ok(NetworkSource::new(location)),
        None => NetworkSource::from_config(conf),
    }
}

fn summarize(reachmap: &Reachmap<HeadlessMap>) -> ReachSummary {
    let positions = reachmap
        .positions()
        .iter()
        .enumerate()
        .map(|(index, p)| PositionSummary {
            index,
            time_budget: p.time_budget(),
            lat: p.origin().lat,
            lng: p.origin().lng,
            status: format!("{:?}", p.status()).to_lowercase(),
            reachable_stations: p
                .reachable_times()
                .map(|t| t.values().filter(|s| **s < p.time_budget()).count())
                .unwrap_or_default(),
        })
        .collect_vec();
    ReachSummary {
        positions,
        state: reachmap.view_state(),
    }
}

fn render_tiles(
    reachmap: &Reachmap<HeadlessMap>,
    tiles: &[TileCoord],
    output_directory: &Path,
) -> Result<(), CliError> {
    std::fs::create_dir_all(output_directory).map_err(|source| CliError::WriteError {
        path: output_directory.to_string_lossy().to_string(),
        source,
    })?;
    let renderer = reachmap.renderer();
    let network = reachmap.network().map(Arc::as_ref);
    let positions = reachmap.positions();
    let projection = reachmap.map().projection();
    let tile_size = reachmap.map().tile_size();

    let masks: Vec<(TileCoord, TileMask)> = tiles
        .par_iter()
        .map(|tile| {
            let mask = renderer.render(tile, tile_size, network, positions, &projection);
            (*tile, mask)
        })
        .collect();

    let write_iter = tqdm!(masks.into_iter(), desc = "writing tiles", total = tiles.len());
    for (tile, mask) in write_iter {
        let path = output_directory.join(format!("{}_{}_{}.pam", tile.z, tile.x, tile.y));
        let write_error = |source: std::io::Error| CliError::WriteError {
            path: path.to_string_lossy().to_string(),
            source,
        };
        let file = std::fs::File::create(&path).map_err(write_error)?;
        let mut writer = std::io::BufWriter::new(file);
        mask.write_pam(&mut writer).map_err(write_error)?;
        writer.flush().map_err(write_error)?;
    }
    eprintln!();
    log::info!(
        "wrote {} tiles to {}",
        tiles.len(),
        output_directory.to_string_lossy()
    );
    Ok(())
}
