#[tokio::main]
async fn main() {
    let code = prioq::app::startup::startup().await;
    std::process::exit(code);
}
