//! Resolves peer endpoints given on the command line.
//!
//! Usage: `resolve [--boot] [--priority] <endpoint>...`
//!
//! Set `RUST_LOG=wg_endpoint=debug` to see what the resolver is doing.
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wg_endpoint::conf::{ResolveConfig, SrvSelection};
use wg_endpoint::{Config, Endpoint, EndpointResolver, Peer};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut conf = ResolveConfig::new();
    let mut config = Config::new("demo");
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--boot" => conf.set_started_at_boot(true),
            "--priority" => conf.set_srv_selection(SrvSelection::Priority),
            _ => match arg.parse::<Endpoint>() {
                Ok(endpoint) => config.peers.push(Peer::new(endpoint)),
                Err(err) => {
                    eprintln!("invalid endpoint '{arg}': {err}");
                    return ExitCode::FAILURE;
                }
            },
        }
    }
    if config.peers.is_empty() {
        println!("Usage: resolve [--boot] [--priority] <endpoint>...");
        return ExitCode::FAILURE;
    }

    let original: Vec<_> =
        config.peers.iter().map(|peer| peer.endpoint.clone()).collect();
    let resolver = EndpointResolver::system(conf);
    let res = resolver.resolve_endpoints(&mut config);
    for (from, peer) in original.iter().zip(&config.peers) {
        println!("{from} -> {}", peer.endpoint);
    }
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
