//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "facecap", version, about = "Camera enumeration and capture playback")]
pub struct Cli {
    /// Configuration file (defaults to facecap_config.json when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List capture devices with their resolutions and chosen format
    List {
        /// Write each non-empty device preview as a PNG into DIR
        #[arg(long, value_name = "DIR")]
        save_previews: Option<PathBuf>,
    },
    /// Pull frames from a camera or a video file
    Play(PlayArgs),
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Video file to play back
    #[arg(long, value_name = "PATH", conflicts_with = "device")]
    pub file: Option<PathBuf>,

    /// Camera index (defaults to the configured device)
    #[arg(long, value_name = "N")]
    pub device: Option<u32>,

    /// Requested frame width for cameras
    #[arg(long, requires = "height", conflicts_with = "file")]
    pub width: Option<u32>,

    /// Requested frame height for cameras
    #[arg(long, requires = "width", conflicts_with = "file")]
    pub height: Option<u32>,

    /// Stop after this many frames
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,
}
