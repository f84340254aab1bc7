//! Commandline argument parser using clap for spiralgeom

use crate::layout::ArrayLayout;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(version, about)]
#[allow(missing_docs)]
pub struct GeomArgs {
    #[command(subcommand)]
    /// Which task to perform
    pub command: CommandTask,
}

#[derive(Debug, Subcommand, Clone)]
#[allow(missing_docs)]
pub enum CommandTask {
    /// Compute an array layout and write it to a MicArray xml file
    Generate(GenerateCommand),

    /// Read a layout from a ron file and write it to a MicArray xml file
    Config(ConfigCommand),

    /// Print the positions and size of an existing MicArray xml file
    Inspect(InspectCommand),

    /// Simulate noise sources recorded by an array and write a wav file
    Simulate(SimulateCommand),
}

#[derive(Debug, Args, Clone)]
#[allow(missing_docs)]
pub struct GenerateCommand {
    /// Filename for the geometry to be written to
    #[arg(short = 'o', long = "out", default_value = "spiral_geom.xml")]
    pub outfile: PathBuf,

    #[command(subcommand)]
    pub layout: LayoutCommand,
}

/// The layout strategies, with the parameters of the original scripts as
/// defaults.
#[derive(Debug, Subcommand, Clone, Copy)]
#[allow(missing_docs)]
pub enum LayoutCommand {
    /// Rectangular grid centered on the origin
    Grid {
        /// Number of rows
        #[arg(short, long, default_value_t = 8)]
        rows: usize,

        /// Number of columns
        #[arg(short, long, default_value_t = 8)]
        cols: usize,

        /// Distance between neighbouring microphones, in meters
        #[arg(short, long, default_value_t = 0.05)]
        spacing: f64,
    },

    /// Spiral whose radius grows linearly over two turns
    Linear {
        /// Number of microphones
        #[arg(short = 'n', long, default_value_t = 64)]
        count: usize,

        /// Radius of the first microphone, in meters
        #[arg(short = 'a', long, default_value_t = 0.01)]
        start_offset: f64,

        /// Radius gained per radian, in meters
        #[arg(short = 'b', long, default_value_t = 0.05)]
        growth_rate: f64,
    },

    /// Area-uniform sunflower spiral
    Sunflower {
        /// Number of microphones
        #[arg(short = 'n', long, default_value_t = 64)]
        count: usize,

        /// Radius of the outermost microphone, in meters
        #[arg(short = 'r', long, default_value_t = 0.5)]
        max_radius: f64,

        /// Angular divergence parameter, 5 gives the golden angle
        #[arg(short = 'v', long = "v", default_value_t = 5.0)]
        v: f64,
    },
}

impl From<LayoutCommand> for ArrayLayout {
    fn from(cmd: LayoutCommand) -> Self {
        match cmd {
            LayoutCommand::Grid {
                rows,
                cols,
                spacing,
            } => ArrayLayout::Grid {
                rows,
                cols,
                spacing,
            },
            LayoutCommand::Linear {
                count,
                start_offset,
                growth_rate,
            } => ArrayLayout::LinearSpiral {
                count,
                start_offset,
                growth_rate,
            },
            LayoutCommand::Sunflower {
                count,
                max_radius,
                v,
            } => ArrayLayout::Sunflower {
                count,
                max_radius,
                v,
            },
        }
    }
}

#[derive(Debug, Args, Clone)]
#[allow(missing_docs)]
pub struct ConfigCommand {
    /// RON file holding the layout
    #[arg(short, long)]
    pub layout: PathBuf,

    /// Filename for the geometry to be written to
    #[arg(short = 'o', long = "out", default_value = "spiral_geom.xml")]
    pub outfile: PathBuf,
}

#[derive(Debug, Args, Clone)]
#[allow(missing_docs)]
pub struct InspectCommand {
    /// MicArray xml file to read
    pub file: PathBuf,
}

#[derive(Debug, Args, Clone)]
#[allow(missing_docs)]
pub struct SimulateCommand {
    /// MicArray xml file describing the recording array
    #[arg(short, long)]
    pub geom: PathBuf,

    /// Filename for the recording to be written to
    #[arg(short = 'o', long = "out", default_value = "three_sources.wav")]
    pub outfile: PathBuf,

    /// RON file describing the sources; three built-in sources if omitted
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,
}
