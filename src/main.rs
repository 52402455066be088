use anyhow::anyhow;
use battag::{
    QueryParamSource, RecordSource, Session, SimulatedSource, SourceError, TagSource,
};
use clap::{ArgAction, Parser, Subcommand};
use futures_util::stream;
use tokio::time::Duration;

#[derive(Parser)]
#[command(name = "battag")]
#[command(about = "Decode and display battery specification records")]
struct Cli {
    /// Log more detail, repeat for debug output (RUST_LOG takes precedence)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a hex payload directly
    Decode { hex: String },
    /// Read the payload from the `data` parameter of a dashboard URL
    Url { url: String },
    /// Generate a random plausible record
    Simulate {
        #[arg(long)]
        seed: Option<u64>,
        /// Simulated scanning delay
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },
    /// Read the payload from raw NDEF messages as delivered by a tag reader, one per tag read
    Tag {
        #[arg(short, long = "message", required = true)]
        messages: Vec<String>,
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
    },
    /// Show the default demo record
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut session = Session::new();

    let notification = match cli.command {
        Commands::Decode { hex } => session.apply("input", Ok(hex)),
        Commands::Url { url } => read(&mut session, QueryParamSource::new(url)).await,
        Commands::Simulate { seed, delay_ms } => {
            let source = SimulatedSource::new(seed).with_delay(Duration::from_millis(delay_ms));
            read(&mut session, source).await
        }
        Commands::Tag { messages, timeout_secs } => {
            let reads: Vec<Result<Vec<u8>, SourceError>> = messages
                .iter()
                .map(|m| {
                    hex::decode(m).map_err(|e| SourceError::Read(format!("bad message hex: {e}")))
                })
                .collect();
            let source = TagSource::new(stream::iter(reads))
                .with_timeout(Duration::from_secs(timeout_secs));
            read(&mut session, source).await
        }
        Commands::Demo => session.reset(),
    };

    eprintln!("{}", notification.message);
    if let Some(payload) = session.last_payload() {
        println!("Payload: {payload}");
    }
    print!("{}", session.dashboard());
    println!("Last update: {}", session.last_update().format("%H:%M:%S"));

    if notification.is_error() {
        return Err(anyhow!(notification.message));
    }
    Ok(())
}

async fn read(session: &mut Session, mut source: impl RecordSource) -> battag::Notification {
    session.read_from(&mut source).await
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
