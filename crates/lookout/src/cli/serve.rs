//! The `lookout serve` command: run the HTTP boundary.

use super::ask::ProviderArg;
use anyhow::Context;
use clap::Args;
use lookout_core::{Config, Lookout};
use std::net::SocketAddr;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides `[server] bind`)
    #[arg(long, env = "LOOKOUT_BIND")]
    pub bind: Option<String>,

    /// Browser origin allowed by CORS (overrides `[server] frontend_origin`)
    #[arg(long, env = "FRONTEND_ORIGIN")]
    pub frontend_origin: Option<String>,

    /// Answer provider (overrides `[qa] provider`)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name (provider-specific)
    #[arg(long)]
    pub model: Option<String>,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let config = Config::load()?;

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {bind}"))?;
    let origin = args
        .frontend_origin
        .unwrap_or_else(|| config.server.frontend_origin.clone());

    let provider = args.provider.map(|p| p.to_string());
    let lookout = Lookout::new(config, provider.as_deref(), args.model.as_deref())?;
    tracing::info!(
        provider = lookout.qa().provider_name(),
        model = lookout.qa().model(),
        "Answer provider ready"
    );

    crate::server::serve(lookout, addr, &origin).await
}
