#[path = "llm-compare/app/mod.rs"]
mod app;
#[path = "llm-compare/args.rs"]
mod args;
#[path = "llm-compare/config/mod.rs"]
mod config;
#[path = "llm-compare/display/mod.rs"]
mod display;
#[path = "llm-compare/logging.rs"]
mod logging;
#[path = "llm-compare/presets.rs"]
mod presets;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
