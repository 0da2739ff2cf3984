use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use nes_ppu::emulator::{Command, Emulator, Report};
use nes_ppu::Mirroring;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum MirroringArg {
    Horizontal,
    Vertical,
    SingleLower,
    SingleUpper,
}

impl From<MirroringArg> for Mirroring {
    fn from(arg: MirroringArg) -> Self {
        match arg {
            MirroringArg::Horizontal => Mirroring::Horizontal,
            MirroringArg::Vertical => Mirroring::Vertical,
            MirroringArg::SingleLower => Mirroring::SingleScreenLower,
            MirroringArg::SingleUpper => Mirroring::SingleScreenUpper,
        }
    }
}

/// Replays CPU bus traffic against the PPU register core and prints the
/// resulting state as JSON.
#[derive(Parser, Debug)]
#[command(name = "nes-ppu", version, about)]
struct Args {
    /// JSON script of bus commands (write, read, cycles, dots, frames)
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Whole frames to run after the script
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// Nametable mirroring of the video memory
    #[arg(long, value_enum, default_value_t = MirroringArg::Horizontal)]
    mirroring: MirroringArg,

    /// Indent the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn load_script(path: &Path) -> Result<Vec<Command>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read script '{}': {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse script '{}': {}", path.display(), e))
}

fn run(args: &Args) -> Result<Report, String> {
    let mut emulator = Emulator::with_mirroring(args.mirroring.into());

    if let Some(path) = &args.script {
        let commands = load_script(path)?;
        log::info!("Loaded {} commands from {}", commands.len(), path.display());
        emulator.run_script(&commands).map_err(|e| e.to_string())?;
    }

    if args.frames > 0 {
        log::info!("Running {} frames", args.frames);
        emulator
            .execute(&Command::Frames { count: args.frames })
            .map_err(|e| e.to_string())?;
    }

    Ok(emulator.report())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    match json {
        Ok(text) => println!("{}", text),
        Err(e) => {
            log::error!("Failed to serialize report: {}", e);
            process::exit(1);
        }
    }
}
