use lead_router_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("lead router error: {err}");
        std::process::exit(1);
    }
}
