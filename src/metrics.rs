// Prometheus metrics definitions for the tactical board backend.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Gauges ───────────────────────────────────────────────────────

    /// Participants currently connected to the board channel.
    pub static ref CONNECTED_CLIENTS: IntGauge =
        IntGauge::new("board_connected_clients", "Connected board participants").unwrap();

    // ── Counters ─────────────────────────────────────────────────────

    /// Total analyze requests served.
    pub static ref ANALYSES_TOTAL: IntCounter = IntCounter::new(
        "board_analyses_total",
        "Total analyze requests served",
    )
    .unwrap();

    /// Total chat requests served.
    pub static ref CHAT_REQUESTS_TOTAL: IntCounter = IntCounter::new(
        "board_chat_requests_total",
        "Total chat requests served",
    )
    .unwrap();

    /// Total board events relayed between participants, by event kind.
    pub static ref EVENTS_RELAYED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("board_events_relayed_total", "Board events relayed"),
        &["event"],
    )
    .unwrap();

    /// Total messages pushed out over WebSocket connections.
    pub static ref WS_MESSAGES_SENT_TOTAL: IntCounter = IntCounter::new(
        "board_ws_messages_sent_total",
        "Total WebSocket messages sent",
    )
    .unwrap();

    /// Commentary provider calls that fell back to local text.
    pub static ref ENRICHMENT_FAILURES_TOTAL: IntCounter = IntCounter::new(
        "board_enrichment_failures_total",
        "Commentary provider failures",
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Commentary provider round-trip time in seconds.
    pub static ref ENRICHMENT_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "board_enrichment_duration_seconds",
            "Commentary provider round-trip time",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0]),
    )
    .unwrap();
}

/// Known relayed event kinds. Anything else is folded into "other" so a
/// hostile client cannot blow up metric cardinality with invented names.
pub fn event_label(name: &str) -> &'static str {
    match name {
        "player-move" => "player-move",
        "ball-move" => "ball-move",
        "move_circle" => "move_circle",
        "path_draw" => "path_draw",
        _ => "other",
    }
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(CONNECTED_CLIENTS.clone()),
        Box::new(ANALYSES_TOTAL.clone()),
        Box::new(CHAT_REQUESTS_TOTAL.clone()),
        Box::new(EVENTS_RELAYED_TOTAL.clone()),
        Box::new(WS_MESSAGES_SENT_TOTAL.clone()),
        Box::new(ENRICHMENT_FAILURES_TOTAL.clone()),
        Box::new(ENRICHMENT_DURATION_SECONDS.clone()),
    ];

    for c in collectors {
        // Repeat registration can only happen in tests; ignore it.
        let _ = REGISTRY.register(c);
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_label_known_and_unknown() {
        assert_eq!(event_label("player-move"), "player-move");
        assert_eq!(event_label("ball-move"), "ball-move");
        assert_eq!(event_label("path_draw"), "path_draw");
        assert_eq!(event_label("made-up-event"), "other");
    }

    #[test]
    fn test_gather_metrics_returns_string() {
        register_metrics();
        let output = gather_metrics();
        assert!(output.is_empty() || output.contains("board_"));
    }

    #[test]
    fn test_metric_increments() {
        CONNECTED_CLIENTS.inc();
        CONNECTED_CLIENTS.dec();
        assert_eq!(CONNECTED_CLIENTS.get(), 0);

        ANALYSES_TOTAL.inc();
        CHAT_REQUESTS_TOTAL.inc();
        EVENTS_RELAYED_TOTAL.with_label_values(&["player-move"]).inc();
        WS_MESSAGES_SENT_TOTAL.inc();
        ENRICHMENT_FAILURES_TOTAL.inc();
        ENRICHMENT_DURATION_SECONDS.observe(0.4);
    }
}
