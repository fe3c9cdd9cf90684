use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::ArgAction;
use registrar::{
    AuditLog, Config, Console, DisplayMode, RecordStore, Session, SessionError,
    session::terminal,
};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// The directory holding the record files and `config.toml`
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// How "view all" listings are rendered. Asked on first use if unset
    #[arg(short, long, value_enum)]
    display: Option<DisplayArg>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DisplayArg {
    Table,
    Summary,
}

impl From<DisplayArg> for DisplayMode {
    fn from(arg: DisplayArg) -> Self {
        match arg {
            DisplayArg::Table => Self::Table,
            DisplayArg::Summary => Self::Summary,
        }
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = Config::load_or_default(&self.root);
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let audit_path = self.root.join(config.audit_log());
        let audit = AuditLog::open(&audit_path).unwrap_or_else(|e| {
            tracing::warn!("Audit log {} unavailable: {e}", audit_path.display());
            AuditLog::discard()
        });

        let mut store = RecordStore::open(&self.root, &config, audit)
            .with_context(|| format!("failed to open records in {}", self.root.display()))?;

        let console = Console::new(io::stdin().lock(), io::stdout().lock())
            .with_color(terminal::supports_color());
        let display = self.display.map(DisplayMode::from).or(config.display);

        Self::serve(&mut store, console, &config, display)
    }

    fn serve<R: BufRead, W: Write>(
        store: &mut RecordStore,
        console: Console<R, W>,
        config: &Config,
        display: Option<DisplayMode>,
    ) -> anyhow::Result<()> {
        let result = Session::new(store, console, config)
            .with_display(display)
            .run();

        match result {
            Ok(()) => Ok(()),
            Err(SessionError::InputClosed) => {
                tracing::debug!("Input closed, ending session");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Session aborted: {e}");
                store.log_event(format_args!("Session aborted: {e}"));
                Err(e.into())
            }
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout carries the menus
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}
