#[tokio::main]
async fn main() -> std::io::Result<()> {
    otp_server::run_with_config().await
}
