#[tokio::main]
async fn main() -> anyhow::Result<()> {
    macroscript::run().await
}
