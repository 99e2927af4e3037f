//! cac - evaluate climate policy proposals from the command line

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cac_cli::run().await?;
    Ok(())
}
