#[tokio::main]
async fn main() -> anyhow::Result<()> {
    daemonmaster::dm::cli::run().await
}
