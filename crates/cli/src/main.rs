use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use hexnav::{
    timed, Grid, GridRenderer, HexNavConfig, NavigationState, Navigator,
    RenderConfig, Tessellation, Trace,
};
use log::{info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// CLI for building hexagon grids and running navigation across them.
#[derive(Debug, StructOpt)]
#[structopt(name = "hexnav")]
enum Opt {
    /// Build a hexagon grid
    Grid {
        #[structopt(flatten)]
        common: CommonOpt,
    },

    /// Build a hexagon grid, then navigate a point across it
    Navigate {
        #[structopt(flatten)]
        common: CommonOpt,

        /// If given, write an SVG of the current frame to the output
        /// directory every N ticks, as `navigate-<tick>.svg`
        #[structopt(long)]
        frame_interval: Option<u32>,

        /// Maximum number of ticks to run before giving up. Overrides the
        /// value in the config file
        #[structopt(long)]
        max_ticks: Option<u32>,
    },

    /// Fill a rectangle with a triangular tessellation
    Tessellate {
        #[structopt(flatten)]
        common: CommonOpt,
    },
}

impl Opt {
    /// The name of the subcommand, which is also the name of output files
    fn name(&self) -> &'static str {
        match self {
            Self::Grid { .. } => "grid",
            Self::Navigate { .. } => "navigate",
            Self::Tessellate { .. } => "tessellate",
        }
    }

    fn common(&self) -> &CommonOpt {
        match self {
            Self::Grid { common }
            | Self::Navigate { common, .. }
            | Self::Tessellate { common } => common,
        }
    }
}

/// Options shared by every subcommand
#[derive(Debug, StructOpt)]
struct CommonOpt {
    /// Path to a config file that defines the grid, navigation and
    /// tessellation. Supported formats: JSON, TOML. If not given, the
    /// default config is used
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// If given, the output will be saved to this directory. The exact files
    /// that appear in the directory are defined by the output formats. See
    /// `--output-formats` for more info
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format(s) to output in. Supported formats:
    ///
    /// cfg - The full config object used for the run, in TOML format
    ///
    /// json - JSON representation of the grid, navigation trace, or
    ///   tessellation
    ///
    /// svg - 2D rendering of the output
    #[structopt(short = "f", long)]
    output_formats: Vec<OutputFormat>,

    /// Hide the ID labels on grid corners. Only relevant for SVG output
    #[structopt(long)]
    hide_labels: bool,

    /// Draw the lines used to pick corners during navigation. Only relevant
    /// for SVG output
    #[structopt(long)]
    show_candidates: bool,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Export the full config in a human-readable file
    Cfg,
    /// Export the output in a serialized JSON format
    Json,
    /// Render the output as a 2D SVG
    Svg,
}

impl OutputFormat {
    fn file_ext(self) -> &'static str {
        match self {
            Self::Cfg => "toml",
            Self::Json => "json",
            Self::Svg => "svg",
        }
    }
}

/// Whatever a subcommand produced, ready to be written out
enum Output<'a> {
    Grid(&'a Grid),
    Navigation {
        grid: &'a Grid,
        trace: &'a Trace,
        final_state: &'a NavigationState,
    },
    Tessellation(&'a Tessellation),
}

fn load_config(config_path: &Path) -> anyhow::Result<HexNavConfig> {
    // Load config
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

/// Write some bytes to a file, replacing whatever was there
fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("error opening output file {:?}", path))?;
    file.write_all(bytes)
        .with_context(|| format!("error writing to file {:?}", path))
}

/// Generate an output form of the result in the given format.
fn gen_output(
    output_dir: &Path,
    name: &str,
    output_format: OutputFormat,
    config: &HexNavConfig,
    output: &Output,
    renderer: &GridRenderer,
) -> anyhow::Result<()> {
    fn generate_bytes(
        output_format: OutputFormat,
        config: &HexNavConfig,
        output: &Output,
        renderer: &GridRenderer,
    ) -> anyhow::Result<Vec<u8>> {
        let bytes = match (output_format, output) {
            (OutputFormat::Cfg, _) => {
                // Go through a Value so plain values get emitted before
                // tables, which TOML requires
                let value = toml::Value::try_from(config)
                    .context("error serializing config")?;
                toml::to_string_pretty(&value)
                    .context("error serializing config")?
                    .into_bytes()
            }
            (OutputFormat::Json, Output::Grid(grid)) => {
                grid.to_json()?.into_bytes()
            }
            (OutputFormat::Json, Output::Navigation { trace, .. }) => {
                trace.to_json()?.into_bytes()
            }
            (OutputFormat::Json, Output::Tessellation(tessellation)) => {
                tessellation.to_json()?.into_bytes()
            }
            (OutputFormat::Svg, Output::Grid(grid)) => {
                renderer.grid_to_svg(grid).to_string().into_bytes()
            }
            (
                OutputFormat::Svg,
                Output::Navigation {
                    grid,
                    trace,
                    final_state,
                },
            ) => renderer
                .trace_to_svg(grid, trace, final_state)
                .to_string()
                .into_bytes(),
            (OutputFormat::Svg, Output::Tessellation(tessellation)) => {
                renderer
                    .tessellation_to_svg(tessellation)
                    .to_string()
                    .into_bytes()
            }
        };
        Ok(bytes)
    }

    let output_file_path =
        output_dir.join(name).with_extension(output_format.file_ext());

    timed!(
        format!(
            "Generating {} output and writing to {:?}",
            output_format, &output_file_path
        ),
        log::Level::Info,
        {
            let bytes =
                generate_bytes(output_format, config, output, renderer)?;
            write_file(&output_file_path, &bytes)?;
        }
    );

    Ok(())
}

/// Run the navigation loop, writing a frame to the output directory every
/// `frame_interval` ticks (if both are given)
fn navigate(
    grid: &Grid,
    navigator: &Navigator,
    renderer: &GridRenderer,
    frames: Option<(&Path, u32)>,
) -> anyhow::Result<(Trace, NavigationState)> {
    let mut state = navigator.start();
    let start = state.position();
    let mut frame_result = Ok(());

    let trace = navigator.run(&mut state, |state| {
        if let Some((output_dir, interval)) = frames {
            if state.ticks() % interval == 0 {
                let path = output_dir
                    .join(format!("navigate-{}", state.ticks()))
                    .with_extension(OutputFormat::Svg.file_ext());
                let svg = renderer.frame_to_svg(grid, start, state).to_string();
                frame_result = write_file(&path, svg.as_bytes());
            }
        }
        // Bail out on the first failed write
        frame_result.is_ok()
    });
    frame_result?;

    Ok((trace, state))
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    let common = opt.common();
    SimpleLogger::new().with_level(common.log_level).init()?;

    let mut config = match &common.config {
        Some(config_path) => load_config(config_path)?,
        None => {
            info!("No config file given, using defaults");
            HexNavConfig::default()
        }
    };

    let output_dir = match &common.output {
        Some(output_dir) => {
            if common.output_formats.is_empty() {
                bail!(
                    "output dir was specified, but no output formats were \
                    given"
                )
            }
            fs::create_dir_all(output_dir).with_context(|| {
                format!("error creating output dir {:?}", output_dir)
            })?;
            Some(output_dir.as_path())
        }
        None => None,
    };

    let renderer = GridRenderer::new(RenderConfig {
        show_corner_labels: !common.hide_labels,
        show_candidates: common.show_candidates,
        ..Default::default()
    })
    .context("invalid render config")?;

    // Each subcommand produces something and then hands it off to be
    // written out. The outputs borrow from these, so they live out here
    let grid;
    let navigation;
    let tessellation;
    let output = match &opt {
        Opt::Grid { .. } => {
            grid = Grid::generate(config.grid)?;
            Output::Grid(&grid)
        }
        Opt::Navigate {
            frame_interval,
            max_ticks,
            ..
        } => {
            if let Some(max_ticks) = max_ticks {
                config.navigation.max_ticks = *max_ticks;
            }
            let frames = match (output_dir, frame_interval) {
                (Some(_), Some(0)) => bail!("frame interval must be positive"),
                (Some(output_dir), Some(interval)) => {
                    Some((output_dir, *interval))
                }
                (None, Some(_)) => {
                    warn!("--frame-interval given without --output, ignoring");
                    None
                }
                (_, None) => None,
            };

            grid = Grid::generate(config.grid)?;
            let navigator = Navigator::new(&grid, config.navigation)?;
            navigation = navigate(&grid, &navigator, &renderer, frames)?;
            let (trace, final_state) = &navigation;
            info!(
                "Closest approach to destination {}: {:.2}",
                trace.destination,
                trace.closest_approach()
            );
            Output::Navigation {
                grid: &grid,
                trace,
                final_state,
            }
        }
        Opt::Tessellate { .. } => {
            tessellation = Tessellation::generate(config.tessellation)?;
            Output::Tessellation(&tessellation)
        }
    };

    // If an output dir was specified, write out output format(s) there
    if let Some(output_dir) = output_dir {
        for &output_format in &common.output_formats {
            gen_output(
                output_dir,
                opt.name(),
                output_format,
                &config,
                &output,
                &renderer,
            )?;
        }
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
