use clap::{Parser, Subcommand};
use orbicfg::decode::{decode_file, DecodeOptions, RngChoice};
use orbicfg::render::{render_raw, render_text};
use orbicfg::DecodeError;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "orbicfg", about = "Decrypt router configuration backups")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt a backup and print its configuration lines
    Decode {
        /// Config backup (e.g. NETGEAR_Orbi.cfg)
        input: PathBuf,
        /// Write to this file instead of stdout (must not exist)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit the decrypted bytes unchanged
        #[arg(long)]
        raw: bool,
        /// Print the output even when the checksum does not match
        #[arg(long)]
        ignore_checksum: bool,
        /// Generator: auto (default), uclibc, musl
        #[arg(long, default_value = "auto", value_parser = parse_rng)]
        rng: RngChoice,
        /// Seed to use instead of the header magic (decimal or 0x hex)
        #[arg(long, value_parser = parse_seed)]
        seed: Option<u32>,
    },
    /// Show the header and how the payload was decrypted
    Info {
        input: PathBuf,
        #[arg(long, default_value = "auto", value_parser = parse_rng)]
        rng: RngChoice,
        #[arg(long, value_parser = parse_seed)]
        seed: Option<u32>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        if let Some(hint) = e.downcast_ref::<DecodeError>().and_then(DecodeError::hint) {
            eprintln!("{hint}");
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {

        // ── Decode ───────────────────────────────────────────────────────────
        Commands::Decode { input, output, raw, ignore_checksum, rng, seed } => {
            let opts = DecodeOptions {
                rng,
                seed,
                verify_checksum: !ignore_checksum,
                ..Default::default()
            };
            let decoded = decode_file(&input, &opts)?;

            let sink: Box<dyn Write> = match &output {
                Some(path) => Box::new(OpenOptions::new().write(true).create_new(true).open(path)?),
                None       => Box::new(io::stdout().lock()),
            };
            if raw {
                render_raw(&decoded.plaintext, sink)?;
            } else {
                render_text(&decoded.plaintext, sink)?;
            }
            if let Some(path) = output {
                eprintln!("Decrypted to {}", path.display());
            }
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input, rng, seed } => {
            let opts = DecodeOptions { rng, seed, verify_checksum: false, ..Default::default() };
            let decoded = decode_file(&input, &opts)?;
            let h = decoded.header;

            println!("── Config backup ───────────────────────────────────────");
            println!("  Path           {}", input.display());
            println!("  Header         {}", hex::encode(h.to_bytes()));
            println!("  Magic          0x{:08x}", h.magic);
            println!("  Length         {} B", h.len);
            println!("  Checksum       0x{:08x} ({})", h.crc, if decoded.checksum_ok { "ok" } else { "BAD" });
            println!("{}", serde_json::to_string_pretty(&decoded.metadata)?);
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn parse_rng(s: &str) -> Result<RngChoice, String> {
    RngChoice::from_name(s).ok_or_else(|| format!("unknown generator '{s}' (auto, uclibc, musl)"))
}

fn parse_seed(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => u32::from_str_radix(digits, 16),
        None         => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid seed '{s}': {e}"))
}
