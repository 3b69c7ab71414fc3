//! Tracing setup for forseti.
//!
//! [`ForsetiTracer`] assembles a `tracing-subscriber` registry from a stdout layer and optional
//! journald and file layers. Each layer carries its own format and filter.
//!
//! ```no_run
//! use forseti_tracing::{ForsetiTracer, LayerInfo, LogFormat, Tracer};
//!
//! let guard = ForsetiTracer::new()
//!     .with_stdout(LayerInfo::new(LogFormat::Terminal, "info".to_string(), String::new(), None))
//!     .init()
//!     .expect("failed to initialize tracing");
//! ```

// Re-export tracing crates
pub use tracing;
pub use tracing_subscriber;

mod formatter;
mod layers;

pub use formatter::LogFormat;
pub use layers::{FileInfo, FileWorkerGuard};

use layers::Layers;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Directive, layer::SubscriberExt, util::SubscriberInitExt};

/// Configures and installs a global tracing subscriber.
pub trait Tracer {
    /// Installs the subscriber. Returns a guard which must be held for as long as file logging
    /// should keep flushing.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

/// Format, filters and colors of a single layer.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    /// Creates a layer description.
    ///
    /// `default_directive` applies when `RUST_LOG` is unset; `filters` is a comma separated list
    /// of extra directives; `color` is `always`, `auto` or `never`, or `None` to disable ANSI.
    pub fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }
}

impl Default for LayerInfo {
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: LevelFilter::INFO.to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// The forseti tracer: a stdout layer plus optional journald and file layers.
#[derive(Debug, Clone, Default)]
pub struct ForsetiTracer {
    stdout: LayerInfo,
    journald: Option<String>,
    file: Option<(LayerInfo, FileInfo)>,
}

impl ForsetiTracer {
    /// Creates a tracer with the default stdout layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stdout layer.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    /// Adds a journald layer filtered by `filter`.
    pub fn with_journald(mut self, filter: String) -> Self {
        self.journald = Some(filter);
        self
    }

    /// Adds a layer writing to a log file.
    pub fn with_file(mut self, config: LayerInfo, file_info: FileInfo) -> Self {
        self.file = Some((config, file_info));
        self
    }
}

impl Tracer for ForsetiTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = Layers::new();

        layers.stdout(
            self.stdout.format,
            self.stdout.default_directive.parse::<Directive>()?,
            &self.stdout.filters,
            self.stdout.color,
        )?;

        if let Some(filter) = &self.journald {
            layers.journald(filter)?;
        }

        let file_guard = match self.file {
            Some((config, file_info)) => {
                Some(layers.file(config.format, &config.filters, file_info)?)
            }
            None => None,
        };

        tracing_subscriber::registry().with(layers.into_inner()).try_init()?;
        Ok(file_guard)
    }
}
