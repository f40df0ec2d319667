#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = peerlink::cli::parse_args("service-b", "Serves GreeterService and calls Service A.");
    let cf = match service_b::defaults().resolve(&args) {
        Ok(cf) => cf,
        Err(e) => peerlink::exit_with(e),
    };
    if args.dump_config {
        match cf.to_toml() {
            Ok(s) => print!("{s}"),
            Err(e) => peerlink::exit_with(e),
        }
        return;
    }

    if let Err(e) = service_b::run(cf).await {
        peerlink::exit_with(e);
    }
}
