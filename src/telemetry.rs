use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_QUESTION_CNTR: CounterVec = register_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions handed out by the quiz",
        &["category"]
    )
    .unwrap();
}

/// Used when `LOG_LEVEL` is unset or does not parse.
pub const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn,tower_http=debug";

fn span_events(flag: Option<&str>) -> FmtSpan {
    match flag {
        Some(value) if value.eq_ignore_ascii_case("true") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::NONE,
    }
}

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Structured logs to stdout. `LOG_LEVEL` takes `EnvFilter` directives,
/// `INCLUDE_SPAN_EVENTS=true` adds span enter/exit lines.
pub fn init_tracing() {
    let include_spans = std::env::var("INCLUDE_SPAN_EVENTS").ok();
    let level = std::env::var("LOG_LEVEL").ok();

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_span_events(span_events(include_spans.as_deref()));

    tracing_subscriber::registry()
        .with(log_filter(level.as_deref()))
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_valid() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn unparseable_level_falls_back_to_default() {
        assert_eq!(
            log_filter(Some("trivia_api=loud")).to_string(),
            EnvFilter::new(DEFAULT_LOG_FILTER).to_string()
        );
        assert_ne!(
            log_filter(Some("debug")).to_string(),
            EnvFilter::new(DEFAULT_LOG_FILTER).to_string()
        );
        assert_eq!(
            log_filter(None).to_string(),
            EnvFilter::new(DEFAULT_LOG_FILTER).to_string()
        );
    }

    #[test]
    fn span_events_only_when_enabled() {
        assert_eq!(span_events(Some("TRUE")), FmtSpan::ENTER | FmtSpan::EXIT);
        assert_eq!(span_events(Some("no")), FmtSpan::NONE);
        assert_eq!(span_events(None), FmtSpan::NONE);
    }
}
