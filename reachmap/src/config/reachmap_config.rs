use super::ConfigError;
use serde::{Deserialize, Serialize};

/// settings for a reachability map, assembled once at construction.
///
/// values are merged from built-in defaults, an optional TOML or JSON
/// file, and `REACHMAP_`-prefixed environment variables, in that order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReachmapConfig {
    /// schedule key (`"{weekday}-{start}"`) used to look up line intervals
    #[serde(alias = "intervalKey")]
    pub interval_key: String,
    /// asset root for the network feed
    pub baseurl: String,
    pub cityid: Option<String>,
    /// longest walk, in seconds, at the start of a trip or between stations
    #[serde(alias = "maxWalkTime")]
    pub max_walk_time: u64,
    /// walking pace. the default of 3 km/h compensates for
    /// as-the-crow-flies distances and general optimism.
    #[serde(alias = "secondsPerKm")]
    pub seconds_per_km: f64,
    /// meters around the origin searched for the first stations
    #[serde(alias = "initialStationSearchRadius")]
    pub initial_station_search_radius: f64,
    /// re-render while the time slider is dragged instead of on release
    #[serde(alias = "redrawOnTimeDrag")]
    pub redraw_on_time_drag: bool,
    pub debug: bool,
    /// search iterations between two progress messages
    pub report_interval: u64,
    /// expected iteration count of a full search, used to estimate progress
    #[serde(alias = "estimatedMaxCalculateCalls")]
    pub estimated_max_calculate_calls: u64,
    /// upper bound of the time slider in seconds
    #[serde(alias = "maxWalkTravelTime")]
    pub max_walk_travel_time: u64,
    pub default_time_budget: u64,
    /// `[lng, lat]` of a position to place when no view state is restored
    pub coordinates: Option<[f64; 2]>,
    pub overlay_color: [u8; 3],
    pub overlay_alpha: f64,
    /// meters around a debug click searched for stations to explain
    pub debug_search_radius: f64,
}

impl Default for ReachmapConfig {
    fn default() -> Self {
        Self {
            interval_key: String::from("1-6"),
            baseurl: String::from("/"),
            cityid: None,
            max_walk_time: 15 * 60,
            seconds_per_km: 3600.0 / 3.0,
            initial_station_search_radius: 1000.0,
            redraw_on_time_drag: false,
            debug: false,
            report_interval: 5000,
            estimated_max_calculate_calls: 100_000,
            max_walk_travel_time: 90 * 60,
            default_time_budget: 15 * 60,
            coordinates: None,
            overlay_color: [50, 50, 50],
            overlay_alpha: 0.4,
            debug_search_radius: 300.0,
        }
    }
}

impl ReachmapConfig {
    pub const ENV_PREFIX: &'static str = "REACHMAP";

    /// merges defaults, an optional config file and the environment, then validates.
    pub fn from_sources(file: Option<&str>) -> Result<ReachmapConfig, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(f) = file {
            log::info!("reading reachmap configuration from {f}");
            builder = builder.add_source(config::File::with_name(f));
        }
        builder = builder.add_source(config::Environment::with_prefix(Self::ENV_PREFIX));
        let conf: ReachmapConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::SourceError(e.to_string()))?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_key.is_empty() {
            return Err(invalid("interval_key", "must not be empty"));
        }
        if !(self.seconds_per_km.is_finite() && self.seconds_per_km > 0.0) {
            return Err(invalid(
                "seconds_per_km",
                format!("must be a positive number, found {}", self.seconds_per_km),
            ));
        }
        if !(self.initial_station_search_radius.is_finite()
            && self.initial_station_search_radius > 0.0)
        {
            return Err(invalid(
                "initial_station_search_radius",
                format!(
                    "must be a positive number, found {}",
                    self.initial_station_search_radius
                ),
            ));
        }
        if self.report_interval == 0 {
            return Err(invalid("report_interval", "must be greater than zero"));
        }
        if self.estimated_max_calculate_calls == 0 {
            return Err(invalid(
                "estimated_max_calculate_calls",
                "must be greater than zero",
            ));
        }
        if !(0.0..=1.0).contains(&self.overlay_alpha) {
            return Err(invalid(
                "overlay_alpha",
                format!("must be within [0, 1], found {}", self.overlay_alpha),
            ));
        }
        if !(self.debug_search_radius.is_finite() && self.debug_search_radius >= 0.0) {
            return Err(invalid(
                "debug_search_radius",
                format!("must be non-negative, found {}", self.debug_search_radius),
            ));
        }
        if let Some([lng, lat]) = self.coordinates {
            if !(lng.is_finite() && lat.is_finite()) {
                return Err(invalid("coordinates", "must be finite"));
            }
        }
        Ok(())
    }

    pub fn walk_meters_per_second(&self) -> f64 {
        1000.0 / self.seconds_per_km
    }

    pub fn seconds_per_meter(&self) -> f64 {
        self.seconds_per_km / 1000.0
    }

    /// meters covered within `max_walk_time`.
    pub fn max_walk_distance(&self) -> f64 {
        self.max_walk_time as f64 * self.walk_meters_per_second()
    }

    /// location of the network feed for the configured city.
    pub fn network_url(&self) -> Result<String, ConfigError> {
        let cityid = self
            .cityid
            .as_deref()
            .ok_or(ConfigError::MissingValue("cityid"))?;
        let suffix = if self.debug { "__debug" } else { "" };
        let base = self.baseurl.trim_end_matches('/');
        Ok(format!("{base}/{cityid}/{cityid}{suffix}.json"))
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}
