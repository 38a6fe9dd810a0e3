#[tokio::main]
async fn main() -> anyhow::Result<()> {
    venue_book::run().await
}
