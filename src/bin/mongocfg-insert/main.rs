mod cli;
mod records;

use crate::cli::Cli;
use crate::records::{read_csv, read_json};

use anyhow::{bail, Context, Result};
use clap::Parser;
use mongocfg::Settings;
use std::fs::{self, File};
use std::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mongocfg=info,mongocfg_insert=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Cli::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path).with_context(|| format!("loading {}", path))?,
        None => Settings::default(),
    };
    let settings = args.merge_into(settings);

    if settings.host.is_empty() {
        bail!("No host given: pass --host or set `host` in the settings file.");
    }
    let db = match &settings.database {
        Some(db) if !db.is_empty() => db.clone(),
        _ => bail!("No database given: pass --db or set `database` in the settings file."),
    };

    let docs = if args.csv {
        let file = File::open(&args.input).with_context(|| format!("opening {}", args.input))?;
        read_csv(BufReader::new(file), !args.no_header)?
    } else {
        let text = fs::read_to_string(&args.input)
            .with_context(|| format!("reading {}", args.input))?;
        read_json(&text)?
    };

    let mut conf = settings.into_config();

    if args.dry_run {
        for (i, doc) in docs.iter().enumerate() {
            println!("Record {}: {:?}", i + 1, doc);
        }
        let timeout = match conf.server_selection_timeout() {
            Some(t) => format!("{} ms", t.as_millis()),
            None => "driver default".to_string(),
        };
        println!(
            "Dry run: {} records for {}.{} on {}:{} (server selection timeout: {})",
            docs.len(),
            db,
            args.collection,
            conf.host(),
            conf.port(),
            timeout
        );
        return Ok(());
    }

    conf.connect().await?;

    match conf.insert(&docs, &args.collection).await? {
        Some(result) => println!(
            "✅ Inserted {} documents into {}.{}",
            result.inserted_ids.len(),
            db,
            args.collection
        ),
        None => println!("No records found in {}", args.input),
    }

    conf.close().await;
    Ok(())
}
