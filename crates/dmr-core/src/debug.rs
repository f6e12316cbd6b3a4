use core::fmt;
use std::sync::Once;
use std::fs::OpenOptions;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt as tracingfmt, EnvFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

struct AlignedFormatter;

/// Picks up the optional `slot` field, so it can be shown in front of the location
struct SlotVisitor {
    slot: Option<String>,
}

impl tracing::field::Visit for SlotVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "slot" {
            self.slot = Some(format!("{:?}", value));
        }
    }
}

impl<S, N> FormatEvent<S, N> for AlignedFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let mut visitor = SlotVisitor { slot: None };
        event.record(&mut visitor);
        let has_slot = visitor.slot.is_some();
        let slot_str = visitor.slot.unwrap_or_else(|| "   ".to_string());

        let (color_level, color_reset) = match *metadata.level() {
            tracing::Level::ERROR => ("\x1b[31m", "\x1b[0m"),
            tracing::Level::WARN => ("\x1b[33m", "\x1b[0m"),
            tracing::Level::INFO => ("\x1b[32m", "\x1b[0m"),
            tracing::Level::DEBUG => ("\x1b[34m", "\x1b[0m"),
            tracing::Level::TRACE => ("\x1b[35m", "\x1b[0m"),
        };

        // "crates/dmr-entities/src/slot/relay_slot.rs" becomes "TS1 [entities/slot] relay_slot.rs"
        let file_path = metadata.file().unwrap_or("unknown");
        let formatted_path = if let Some(src_idx) = file_path.find("/src/") {
            let before_src = &file_path[..src_idx];
            let after_src = &file_path[src_idx + 5..];

            let crate_name = if let Some(dmr_idx) = before_src.rfind("dmr-") {
                &before_src[dmr_idx + 4..]
            } else {
                before_src.rsplit('/').next().unwrap_or("unknown")
            };

            if let Some(last_slash) = after_src.rfind('/') {
                let module_path = &after_src[..last_slash];
                let filename = &after_src[last_slash + 1..];
                let first_module = module_path.split('/').next().unwrap_or("");
                format!("{} [{}/{}] {}", slot_str, crate_name, first_module, filename)
            } else {
                format!("{} [{}] {}", slot_str, crate_name, after_src)
            }
        } else {
            file_path.to_string()
        };

        let location = format!(
            "{}{:<5}{} {}:{}:",
            color_level,
            metadata.level(),
            color_reset,
            formatted_path,
            metadata.line().unwrap_or(0)
        );

        let mut message_buf = String::new();
        let message_writer = format::Writer::new(&mut message_buf);
        ctx.field_format().format_fields(message_writer, event)?;

        // Already printed in front, drop it from the message
        if has_slot {
            if let Some(slot_idx) = message_buf.find("slot=") {
                if let Some(space_idx) = message_buf[slot_idx..].find(' ') {
                    message_buf.replace_range(slot_idx..slot_idx + space_idx + 1, "");
                } else {
                    message_buf.truncate(slot_idx);
                }
            }
        }

        // Frames going in or out get a marker, keep them aligned with the rest
        let mut padding = 64;
        if message_buf.starts_with("->") || message_buf.starts_with("<-") {
            padding -= 3;
        }

        write!(writer, "{:<width$} {}", location, message_buf, width = padding)?;
        writeln!(writer)
    }
}

static INIT_LOG: Once = Once::new();

/// Sets up logging with maximum verbosity (trace level)
/// Mainly for unit tests
pub fn setup_logging_verbose() {
    setup_logging(EnvFilter::new("trace"), None);
}

/// Sets up default logging to stdout and optionally, a verbose log file
/// Returns a guard, that needs to be kept alive for logging to file to work
pub fn setup_logging_default(verbose_logfile: Option<String>) -> Option<WorkerGuard> {
    let stdout_filter = get_default_stdout_filter();
    let logfile_and_filter = verbose_logfile.map(|file| (file, get_default_logfile_filter()));
    setup_logging(stdout_filter, logfile_and_filter)
}

pub fn get_default_stdout_filter() -> EnvFilter {
    EnvFilter::new("info")
        // Per-burst chatter
        .add_directive(directive("dmr_entities::slot=info"))
        .add_directive(directive("dmr_entities::modem=info"))
        .add_directive(directive("dmr_entities::network=info"))

        // Decisions worth seeing
        .add_directive(directive("dmr_entities::control=debug"))
        .add_directive(directive("dmr_entities::access_control=debug"))
}

fn get_default_logfile_filter() -> EnvFilter {
    EnvFilter::new("debug")
}

/// Directives above are literals; a typo shows up as a warning instead of a crash
fn directive(s: &str) -> tracing_subscriber::filter::Directive {
    match s.parse() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("invalid log directive {}: {}", s, e);
            tracing_subscriber::filter::LevelFilter::INFO.into()
        }
    }
}

/// Sets up logging to stdout and optionally, a verbose log file
/// If an output file is requested, returns Some<WorkerGuard>. Keep this value alive
/// or logging to file may cease working. If no output file is provided, or it can't
/// be opened, returns None.
fn setup_logging(stdout_filter: EnvFilter, outfile: Option<(String, EnvFilter)>) -> Option<WorkerGuard> {
    let file = outfile.and_then(|(path, filter)| {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(f) => Some((f, filter)),
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", path, e);
                None
            }
        }
    });

    if let Some((file, outfile_filter)) = file {
        let (file_writer, guard) = tracing_appender::non_blocking(file);

        INIT_LOG.call_once(|| {
            let file_layer = tracingfmt::layer()
                .event_format(AlignedFormatter)
                .with_writer(file_writer)
                .with_ansi(false);
            let stdout_layer = tracingfmt::layer()
                .event_format(AlignedFormatter);

            tracing_subscriber::registry()
                .with(file_layer.with_filter(outfile_filter))
                .with(stdout_layer.with_filter(stdout_filter))
                .init();
        });

        Some(guard)
    } else {
        INIT_LOG.call_once(|| {
            let stdout_layer = tracingfmt::layer()
                .event_format(AlignedFormatter);

            tracing_subscriber::registry()
                .with(stdout_layer.with_filter(stdout_filter))
                .init();
        });
        None
    }
}
