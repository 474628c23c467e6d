//! Serve command: MCP server on stdio.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use orphan_studio_core::RhymeData;

use crate::server::{ProjectServer, ServerLimits};

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // Transport is always stdio
}

/// Serve the rhyme engine over MCP until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    data: RhymeData,
    limits: ServerLimits,
) -> anyhow::Result<()> {
    info!(bank = ?data.summary(), "starting MCP server on stdio");

    let server = ProjectServer::with_data(Arc::new(data), limits);
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    service
        .waiting()
        .await
        .context("MCP server terminated abnormally")?;

    info!("MCP server stopped");
    Ok(())
}
