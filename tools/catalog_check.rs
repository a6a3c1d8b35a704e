use std::env;
use std::sync::Arc;

use common::TimeBucket;
use library::{Catalog, CatalogSettings, FileSource, FixedToggle};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let songs_path = args
        .next()
        .or_else(|| env::var("SONGS_PATH").ok())
        .ok_or("SONGS_PATH not set and no path argument")?;
    let remote = matches!(args.next().as_deref(), Some("--remote"));

    let catalog = Catalog::new(
        Arc::new(FileSource::new(&songs_path)),
        Arc::new(FixedToggle::new(remote)),
        CatalogSettings::default(),
    );
    if !catalog.ensure_ready().await {
        error!("Catalog failed to build from {}", songs_path);
        return Err(format!("could not build catalog from {}", songs_path).into());
    }

    println!(
        "Loaded {} tracks in {} genres ({} source)",
        catalog.track_count(),
        catalog.genres().len(),
        if remote { "remote" } else { "local" }
    );
    for bucket in TimeBucket::ALL {
        let counts = catalog.facet_counts(bucket);
        println!(
            "{}: {} songs ({} instrumental, {} vocal, {} jugalbandi)",
            bucket, counts.all, counts.instrumental, counts.vocal, counts.jugalbandi
        );
        for (name, count) in counts.instruments.iter().chain(counts.artists.iter()) {
            println!("  {}: {}", name, count);
        }
    }

    Ok(())
}
