//! `tracing` events routed through `HandlerLayer`, with the ambient context

use pretty_assertions::assert_eq;
use serde_json::Value as Json;
use slogkit::{
    Attr, Context, ContextFields, ContextHandler, ExtractError, HandlerLayer, HandlerOptions,
    Level, MemoryWriter,
};
use tracing_subscriber::layer::SubscriberExt;

fn handler(out: &MemoryWriter) -> ContextHandler {
    ContextHandler::new(
        HandlerOptions::new()
            .json()
            .level(Level::Debug)
            .writer(out.clone())
            .add_source()
            .extractor(ContextFields),
    )
}

fn parsed(out: &MemoryWriter) -> Vec<Json> {
    out.lines()
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn events_outside_a_scope_use_the_background_context() {
    let out = MemoryWriter::new();
    let subscriber = tracing_subscriber::registry().with(HandlerLayer::new(handler(&out)));

    tracing::subscriber::with_default(subscriber, || {
        tracing::trace!("below minimum");
        tracing::info!(attempt = 2_i64, "retrying");
    });

    let lines = parsed(&out);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["msg"], "retrying");
    assert_eq!(lines[0]["attempt"], 2);
    assert!(lines[0].get("request_id").is_none());
}

#[test]
fn event_location_becomes_source() {
    let out = MemoryWriter::new();
    let subscriber = tracing_subscriber::registry().with(HandlerLayer::new(handler(&out)));

    let line_no = line!() + 2;
    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!("careful");
    });

    let lines = parsed(&out);
    let source = lines[0]["source"].as_str().unwrap();
    assert!(source.ends_with(&format!("tracing_bridge.rs:{line_no}")), "{source}");
}

#[test]
fn sync_scope_feeds_the_extractor() {
    let out = MemoryWriter::new();
    let subscriber = tracing_subscriber::registry().with(HandlerLayer::new(handler(&out)));

    tracing::subscriber::with_default(subscriber, || {
        Context::new()
            .with_request_id("req-1")
            .with_field("tenant", "acme")
            .scope_sync(|| tracing::info!("inside"));
        tracing::info!("outside");
    });

    let lines = parsed(&out);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["request_id"], "req-1");
    assert_eq!(lines[0]["tenant"], "acme");
    assert!(lines[1].get("request_id").is_none());
}

#[test]
fn failing_extractor_does_not_block_events() {
    let out = MemoryWriter::new();
    let handler = ContextHandler::new(
        HandlerOptions::new()
            .json()
            .writer(out.clone())
            .extractor(|_: &Context| -> Result<Vec<Attr>, ExtractError> {
                Err(ExtractError::new("no tenant"))
            }),
    );
    let subscriber = tracing_subscriber::registry().with(HandlerLayer::new(handler));

    tracing::subscriber::with_default(subscriber, || {
        Context::new().scope_sync(|| tracing::error!(code = 500_u64, "upstream failed"));
    });

    let lines = parsed(&out);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["code"], 500);
}

#[cfg(feature = "async")]
#[tokio::test]
async fn async_scope_survives_await_points() {
    let out = MemoryWriter::new();
    let subscriber = tracing_subscriber::registry().with(HandlerLayer::new(handler(&out)));
    let _default = tracing::subscriber::set_default(subscriber);

    let ctx = Context::new().with_request_id("req-async");
    ctx.scope(async {
        tracing::info!("before");
        tokio::task::yield_now().await;
        tracing::info!("after");
    })
    .await;

    let lines = parsed(&out);
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert_eq!(line["request_id"], "req-async");
    }
}
