use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

mod cli;
mod config;
mod dispatcher;
mod enricher;
mod error;
mod event;
mod logging;
mod model;
mod parser;
mod persister;
mod reference;
mod store;
#[cfg(test)]
mod test_support;
mod validator;

use cli::{Command, EventArgs, RecordsArgs, RootArgs};
use config::PipelineConfig;
use dispatcher::{Stage, StageDispatcher};
use event::FileLanded;
use reference::StoreReferenceLoader;
use store::{FsObjectStore, FsRecordStore, RecordStore};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    logging::init(&args.log_level);
    let config = config::load_config(args.config.as_deref())?;

    match args.command {
        Command::Validate(event) => run_stage(Stage::Validate, &args.root, &config, &event),
        Command::Transform(event) => run_stage(Stage::Transform, &args.root, &config, &event),
        Command::Records(records) => print_records(&args.root, &config, &records),
    }
}

fn run_stage(stage: Stage, root: &Path, config: &PipelineConfig, args: &EventArgs) -> Result<()> {
    let event = resolve_event(args)?;
    let objects = FsObjectStore::new(root.to_path_buf());
    let records = FsRecordStore::new(root.to_path_buf());
    let references = StoreReferenceLoader::new(&objects, config);
    let dispatcher = StageDispatcher::new(config, &objects, &references, &records);

    let outcome = dispatcher
        .run(stage, &event)
        .with_context(|| format!("{} stage failed for {}", stage.as_str(), event.key))?;
    print_json(&outcome)
}

fn resolve_event(args: &EventArgs) -> Result<FileLanded> {
    if let (Some(bucket), Some(key)) = (&args.bucket, &args.key) {
        return Ok(FileLanded::new(bucket.as_str(), key.as_str()));
    }
    let path = args
        .event
        .as_ref()
        .ok_or_else(|| anyhow!("either --event or --bucket/--key is required"))?;
    let bytes = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("read event from stdin")?;
        buf
    } else {
        std::fs::read(path).with_context(|| format!("read event {}", path.display()))?
    };
    FileLanded::from_slice(&bytes).context("parse file-landed event")
}

fn print_records(root: &Path, config: &PipelineConfig, args: &RecordsArgs) -> Result<()> {
    let store = FsRecordStore::new(root.to_path_buf());
    let table = args.table.as_deref().unwrap_or(&config.table);
    if let Some(record_id) = &args.record_id {
        let record = store
            .get(table, record_id)
            .with_context(|| format!("read record {record_id} from {table}"))?
            .ok_or_else(|| anyhow!("record {record_id} not found in {table}"))?;
        return print_json(&record);
    }
    let records: serde_json::Map<String, serde_json::Value> = store
        .list(table)
        .with_context(|| format!("list records in {table}"))?
        .into_iter()
        .collect();
    print_json(&records)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}
