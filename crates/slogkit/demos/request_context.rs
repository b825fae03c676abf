//! Request-scoped logging through the `tracing` macros.
//!
//! Run with `SLOGKIT_FORMAT=json cargo run --example request_context`.

use slogkit::prelude::*;
use slogkit::{Config, ExtractError};

fn tenant_and_ids(ctx: &Context) -> Result<Vec<Attr>, ExtractError> {
    let mut attrs = slogkit::ContextFields.extract(ctx)?;
    if ctx.field("tenant").is_none() {
        return Err(ExtractError::new("request without tenant"));
    }
    attrs.push(Attr::bool("authenticated", ctx.user_id.is_some()));
    Ok(attrs)
}

async fn handle_request(id: u32, user: Option<&str>) {
    let mut ctx = Context::new()
        .with_request_id(format!("req-{id}"))
        .with_field("tenant", "acme");
    if let Some(user) = user {
        ctx = ctx.with_user_id(user);
    }

    ctx.scope(async move {
        info!(path = "/invoices", "request received");
        tokio::task::yield_now().await;
        warn!(latency_ms = 250_u64, "slow upstream");
    })
    .await;
}

#[tokio::main]
async fn main() -> LogResult<()> {
    let mut config = Config::from_env();
    config.source.enabled = true;
    config.pid.enabled = true;
    config.fields.service = Some("billing".into());

    let _guard = slogkit::init_with_extractor(config, tenant_and_ids)?;

    info!("starting");

    let requests = (1..=3).map(|id| {
        let user = (id % 2 == 1).then_some("u-7");
        tokio::spawn(handle_request(id, user))
    });
    for request in requests.collect::<Vec<_>>() {
        let _ = request.await;
    }

    // missing tenant: written without context attributes, reported on stderr
    Context::new()
        .with_request_id("req-anon")
        .scope_sync(|| error!("rejected"));

    Ok(())
}
