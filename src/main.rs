use clap::{Parser, Subcommand};

use fintrack::repositories::session::SessionStore;
use fintrack::{services, settings, tui};

#[derive(Parser)]
#[command(name = "fintrack", about = "Terminal client for the expense tracker backend")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Clear the stored session without starting the UI
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging()?;

    let settings = settings::Settings::new(&args.config)?;
    let store = SessionStore::open(settings.session.file.as_deref())?;

    if let Some(Command::Logout) = args.command {
        store.clear()?;
        println!("Session cleared.");
        return Ok(());
    }

    let session = store.load();
    let channels = services::start_services(&settings, store);

    tui::run(channels, session, &settings).await
}

// The terminal is owned by the TUI, so logs go to a file instead of stdout.
fn init_logging() -> anyhow::Result<()> {
    use log4rs::append::file::FileAppender;
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}",
        )))
        .build("fintrack.log")?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(log::LevelFilter::Info))?;

    log4rs::init_config(config)?;
    Ok(())
}
