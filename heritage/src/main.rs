mod config;
mod errors;
mod loader;
mod model;
mod render;

use clap::Parser;
use config::Args;
use loader::HeritageClient;
use render::{Collection, Listing};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so the listings can be piped
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let client = HeritageClient::new(args.base_url.as_str());
    info!("Loading heritage data from {}", client.url(Collection::Sites));

    for collection in [Collection::Sites, Collection::OralHistories] {
        print_section(collection, &Listing::Loading, args.html);
    }

    let (sites, oral_histories) =
        tokio::join!(client.load_sites(), client.load_oral_histories());

    print_section(Collection::Sites, &sites, args.html);
    print_section(Collection::OralHistories, &oral_histories, args.html);

    Ok(())
}

fn print_section(collection: Collection, listing: &Listing, html: bool) {
    if html {
        println!(
            "<section id=\"{}\"><h2>{}</h2><ul>{}</ul></section>",
            collection.path(),
            collection.heading(),
            listing.to_html()
        );
    } else {
        println!("== {} ==", collection.heading());
        print!("{}", listing);
        println!();
    }
}
