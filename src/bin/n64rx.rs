// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Headless Nintendo 64 runner
//!
//! Boots a cartridge, runs a number of frames and optionally writes the
//! last frame, a save state, or the parsed ROM header.

use clap::Parser;
use log::{error, info};
use n64rx::core::config::EmulatorConfig;
use n64rx::core::error::{EmulatorError, Result};
use n64rx::core::loader::Cartridge;
use n64rx::core::system::{Frame, System};
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Nintendo 64 emulator (headless)
#[derive(Parser)]
#[command(name = "n64rx")]
#[command(about = "Nintendo 64 emulator core", long_about = None)]
struct Args {
    /// Path to a cartridge image (.z64, .v64 or .n64)
    rom_file: PathBuf,

    /// TOML configuration file (falls back to $N64RX_CONFIG)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Number of frames to run
    #[arg(short = 'f', long, default_value = "60")]
    frames: u64,

    /// Skip IPL3 and jump straight to the game entry point
    #[arg(long)]
    hle: bool,

    /// Restore this save state after booting
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Write a save state when done
    #[arg(long)]
    save_state: Option<PathBuf>,

    /// Write the last frame as a binary PPM
    #[arg(long)]
    dump_frame: Option<PathBuf>,

    /// Print the ROM header as JSON and exit
    #[arg(long)]
    dump_header: bool,
}

fn load_config(args: &Args) -> Result<EmulatorConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| env::var("N64RX_CONFIG").ok().map(PathBuf::from));

    let mut config = match path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            EmulatorConfig::load(&path)?
        }
        None => EmulatorConfig::default(),
    };
    if args.hle {
        config.boot.hle = true;
    }
    Ok(config)
}

/// Write RGB as binary PPM (P6), dropping alpha
fn write_ppm(path: &Path, frame: &Frame) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write!(file, "P6\n{} {}\n255\n", frame.width, frame.height)?;
    for pixel in frame.pixels.chunks_exact(4) {
        file.write_all(&pixel[..3])?;
    }
    file.flush()?;
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let cartridge = Cartridge::load(&args.rom_file)?;
    info!(
        "Cartridge: \"{}\" ({}), {} bytes",
        cartridge.header.title,
        cartridge.header.game_code,
        cartridge.len()
    );

    if args.dump_header {
        let json = serde_json::to_string_pretty(&cartridge.header)
            .map_err(|e| EmulatorError::Config(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    let config = load_config(&args)?;
    let mut system = System::new(config);
    system.insert_cartridge(cartridge);
    system.boot()?;

    if let Some(path) = &args.load_state {
        info!("Restoring save state from: {}", path.display());
        system.load_state_from_file(path)?;
    }

    info!("Running {} frames...", args.frames);
    let log_interval = (args.frames / 10).max(1);
    for frame in 0..args.frames {
        system.run_frame();
        if frame % log_interval == 0 && frame > 0 {
            info!(
                "Progress: {}/{} frames | PC: 0x{:016X} | lines: {}",
                frame,
                args.frames,
                system.cpu().pc(),
                system.ticks()
            );
        }
    }
    system.stop();

    info!("Emulation finished after {} frames", system.frames());
    info!("Final PC: 0x{:016X}", system.cpu().pc());

    let samples = system.drain_audio_samples();
    if !samples.is_empty() {
        info!(
            "{} audio samples pending at {} Hz",
            samples.len(),
            system.audio_sample_rate()
        );
    }

    if let Some(path) = &args.dump_frame {
        write_ppm(path, &system.current_frame())?;
        info!("Frame written to {}", path.display());
    }
    if let Some(path) = &args.save_state {
        system.save_state_to_file(path)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("n64rx v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    run(args).inspect_err(|e| error!("{}", e))
}
