mod capture;
mod config;

use c37118_core::ieee_c37_118::commands::CommandType;
use c37118_core::ieee_c37_118::frame::{Frame, Message, Parser};
use c37118_core::ieee_c37_118::utils::{calculate_crc, now_soc_fracsec};
use c37118_core::sample::samples_from_frame;
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

// TIME_BASE used for the FRACSEC of generated command frames.
const COMMAND_TIME_BASE: u32 = 1_000_000;

#[derive(Debug, ClapParser)]
#[command(name = "c37118")]
#[command(about = "Decode and generate IEEE C37.118 frames", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode a capture of concatenated frames
    #[command(arg_required_else_help = true)]
    Decode {
        file: PathBuf,
        /// The file holds hex text instead of raw bytes
        #[arg(long)]
        hex: bool,
        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
    },
    /// Print a command frame as hex
    #[command(arg_required_else_help = true)]
    Command {
        #[arg(value_enum)]
        kind: CommandKind,
        /// Defaults to C37118_IDCODE
        #[arg(long)]
        idcode: Option<u16>,
    },
    /// Print the CRC-CCITT of hex encoded bytes
    #[command(arg_required_else_help = true)]
    Crc { hex: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CommandKind {
    Start,
    Stop,
    Header,
    Config1,
    Config2,
}

impl From<CommandKind> for CommandType {
    fn from(kind: CommandKind) -> Self {
        match kind {
            CommandKind::Start => CommandType::DataStart,
            CommandKind::Stop => CommandType::DataStop,
            CommandKind::Header => CommandType::GetHeader,
            CommandKind::Config1 => CommandType::GetConfig1,
            CommandKind::Config2 => CommandType::GetConfig2,
        }
    }
}

fn decode(file: PathBuf, hex_text: bool, json: bool) -> Result<(), Box<dyn Error>> {
    let buffer = capture::read_capture(&file, hex_text)?;
    info!("Decoding {} bytes from {}", buffer.len(), file.display());

    let mut failure = None;
    let summary = capture::decode_stream(&buffer, |offset, frame, parser: &Parser| {
        if failure.is_some() {
            return;
        }
        if json {
            match serde_json::to_string(frame) {
                Ok(line) => println!("{}", line),
                Err(e) => failure = Some(e),
            }
            return;
        }

        println!(
            "{:>8}  {} idcode={} soc={} fracsec={} size={}",
            offset,
            frame.frame_type(),
            frame.idcode,
            frame.soc,
            frame.fracsec,
            frame.framesize
        );
        match (&frame.message, parser.get_config()) {
            (Some(Message::Data(_)), Some(config)) => {
                for sample in samples_from_frame(frame, config) {
                    println!("          {:?}", sample);
                }
            }
            (Some(Message::Header(header)), _) => println!("          {}", header.text()),
            (Some(message), _) => println!("          {:?}", message),
            (None, _) => println!("          <no configuration, body skipped>"),
        }
    });
    if let Some(e) = failure {
        return Err(e.into());
    }

    if json {
        eprintln!("{}", serde_json::to_string(&summary)?);
    } else {
        eprintln!("{}", summary);
    }
    Ok(())
}

fn command(kind: CommandKind, idcode: u16) -> Result<(), Box<dyn Error>> {
    let (soc, fracsec) = now_soc_fracsec(COMMAND_TIME_BASE);
    let frame = Frame::new(idcode, Message::Command(CommandType::from(kind).into()))
        .with_time(soc, fracsec);
    let bytes = Parser::new().serialize(&frame)?;
    println!("{}", hex::encode(bytes));
    Ok(())
}

fn crc(input: &str) -> Result<(), Box<dyn Error>> {
    let hex_string: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(hex_string)?;
    println!("0x{:04X}", calculate_crc(&bytes));
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = config::Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Cli::parse();

    match args.command {
        Commands::Decode { file, hex, json } => decode(file, hex, json),
        Commands::Command { kind, idcode } => command(kind, idcode.unwrap_or(config.idcode)),
        Commands::Crc { hex } => crc(&hex),
    }
}
