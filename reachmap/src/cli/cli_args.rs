use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub app: App,
}

#[derive(Subcommand)]
pub enum App {
    #[command(
        name = "reach",
        about = "compute reachable stations for positions given as view state tokens"
    )]
    Reach {
        /// network feed, a file path or an http(s) url. defaults to the
        /// feed of the configured `baseurl` and `cityid`
        #[arg(long)]
        network: Option<String>,
        /// TOML or JSON configuration file
        #[arg(long)]
        config: Option<String>,
        /// comma-delimited view state tokens "time,lat,lng,time,lat,lng,..."
        #[arg(long)]
        state: String,
        /// map zoom level, sets the coordinate precision of the printed state
        #[arg(long, default_value_t = 12.0)]
        zoom: f64,
        /// seconds to wait for all searches to finish
        #[arg(long, default_value_t = 120)]
        timeout: u64,
    },
    #[command(
        name = "render",
        about = "render overlay tiles for positions given as view state tokens into PAM images"
    )]
    Render {
        /// network feed, a file path or an http(s) url. defaults to the
        /// feed of the configured `baseurl` and `cityid`
        #[arg(long)]
        network: Option<String>,
        /// TOML or JSON configuration file
        #[arg(long)]
        config: Option<String>,
        /// comma-delimited view state tokens "time,lat,lng,time,lat,lng,..."
        #[arg(long)]
        state: String,
        /// tile zoom level
        #[arg(long)]
        zoom: u32,
        /// inclusive tile range "x0,y0,x1,y1" at the given zoom
        #[arg(long)]
        tiles: String,
        /// directory receiving one "{z}_{x}_{y}.pam" file per tile
        #[arg(long)]
        output_directory: String,
        /// seconds to wait for all searches to finish
        #[arg(long, default_value_t = 120)]
        timeout: u64,
    },
    #[command(
        name = "config",
        about = "print the effective configuration as TOML"
    )]
    Config {
        /// TOML or JSON configuration file
        #[arg(long)]
        config: Option<String>,
    },
}
