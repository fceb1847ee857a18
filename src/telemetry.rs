use prometheus::register_int_counter_vec;
use prometheus::IntCounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

use crate::config::LogSettings;

lazy_static! {
    pub static ref CATEGORY_LOOKUPS: IntCounterVec = register_int_counter_vec!(
        "category_lookups_total",
        "Number of question lookups by category, by whether any question matched",
        &["found"]
    )
    .expect("metric can be registered");
}

pub fn init_tracing(settings: &LogSettings) {
    let span_events = if std::env::var("INCLUDE_SPAN_EVENTS")
        .is_ok_and(|value| value.eq_ignore_ascii_case("true"))
    {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter_layer);
    if settings.json {
        registry
            .with(fmt::layer().json().with_span_events(span_events))
            .init();
    } else {
        registry
            .with(fmt::layer().with_span_events(span_events))
            .init();
    }
}
