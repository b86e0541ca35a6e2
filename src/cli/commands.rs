use crate::api::{run_api_server, ApiConfig};
use crate::collections::CollectionRegistry;
use crate::config::PortalConfig;
use crate::error::PortalResult;
use crate::service::RecordService;
use crate::storage::{MemoryStore, TabularStore, XlsxStore};
use crate::types::Record;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options shared by every command that touches a workbook.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Portal YAML configuration
    pub config: Option<PathBuf>,
    /// Workbook path, overrides the configuration file
    pub workbook: Option<PathBuf>,
}

impl StoreOptions {
    fn load_config(&self) -> PortalResult<PortalConfig> {
        let mut config = PortalConfig::load_or_default(self.config.as_deref())?;
        if let Some(workbook) = &self.workbook {
            config.workbook = workbook.clone();
        }
        Ok(config)
    }

    fn open(&self) -> PortalResult<(PortalConfig, RecordService)> {
        let config = self.load_config()?;
        let registry = config.registry()?;
        let store: Arc<dyn TabularStore> = Arc::new(XlsxStore::new(&config.workbook));
        Ok((config, RecordService::new(store, registry)))
    }
}

/// Print the configured collections
pub fn collections(options: StoreOptions) -> PortalResult<()> {
    let config = options.load_config()?;
    let registry = config.registry()?;

    println!("{}", "📚 NAAC Portal - Collections".bold().green());
    println!("   Workbook: {}\n", config.workbook.display());

    for spec in registry.iter() {
        println!(
            "   {} {}",
            spec.id.bright_blue().bold(),
            format!("(sheet {}, {} header rows)", spec.sheet, spec.header_rows).dimmed()
        );
        println!("      {}", spec.fields.join(", "));
        if !spec.required.is_empty() {
            println!("      required: {}", spec.required.join(", ").yellow());
        }
    }
    println!();

    Ok(())
}

/// List the records of one collection
pub fn list(options: StoreOptions, collection: String, json: bool) -> PortalResult<()> {
    let (config, service) = options.open()?;
    let records = service.list(&collection)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let spec = service.registry().get(&collection)?;
    println!(
        "{} {} {}",
        "📚".bold(),
        spec.id.bold().green(),
        format!("(sheet {} in {})", spec.sheet, config.workbook.display()).dimmed()
    );
    println!("   {} records\n", records.len());

    for (idx, record) in records.iter().enumerate() {
        println!("   {}", format!("#{}", idx + 1).bright_blue());
        print_record(record);
    }

    Ok(())
}

fn print_record(record: &Record) {
    let width = record.fields().map(str::len).max().unwrap_or(0);
    for (field, value) in record.iter() {
        println!(
            "      {}  {}",
            format!("{:width$}", field, width = width).cyan(),
            value
        );
    }
    println!();
}

/// Add one record (JSON object) at the top of a collection
pub fn add(options: StoreOptions, collection: String, data: String) -> PortalResult<()> {
    let (config, service) = options.open()?;
    let body: serde_json::Value = serde_json::from_str(&data)?;

    let outcome = service.insert(&collection, &body)?;
    let spec = service.registry().get(&collection)?;

    println!("{}", "✅ Data successfully added at the top".bold().green());
    println!(
        "   Collection: {} (sheet {}, row {})",
        outcome.collection,
        spec.sheet,
        spec.header_rows + 1
    );
    println!("   Workbook:   {}\n", config.workbook.display());
    print_record(&outcome.record);

    Ok(())
}

/// Create a workbook seeded with every collection's header block
pub fn init(options: StoreOptions, workbook: PathBuf, force: bool) -> PortalResult<()> {
    let config = options.load_config()?;
    let registry = config.registry()?;

    let store = XlsxStore::init(&workbook, &registry, force)?;

    println!("{}", "✅ Workbook initialised".bold().green());
    println!("   File: {}", store.path().display());
    for spec in registry.iter() {
        println!("   📄 {} → sheet {}", spec.id, spec.sheet);
    }
    println!();

    Ok(())
}

/// Write the records of one collection to a JSON file
pub fn export(options: StoreOptions, collection: String, output: PathBuf) -> PortalResult<()> {
    let (_, service) = options.open()?;
    let records = service.list(&collection)?;

    let json = serde_json::to_string_pretty(&records)?;
    fs::write(&output, json)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   {} records → {}\n", records.len(), output.display());

    Ok(())
}

/// Start the HTTP API
pub fn serve(
    options: StoreOptions,
    host: Option<String>,
    port: Option<u16>,
    in_memory: bool,
) -> anyhow::Result<()> {
    let config = options.load_config()?;
    let registry = config.registry()?;

    let store: Arc<dyn TabularStore> = if in_memory {
        Arc::new(MemoryStore::seeded(&registry))
    } else {
        ensure_workbook(&config.workbook, &registry)?;
        Arc::new(XlsxStore::new(&config.workbook))
    };

    let api_config = ApiConfig {
        host: host.unwrap_or(config.host),
        port: port.unwrap_or(config.port),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_api_server(api_config, RecordService::new(store, registry)))
}

/// Seed the workbook on first start; an existing file is left alone.
pub fn ensure_workbook(path: &Path, registry: &CollectionRegistry) -> PortalResult<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    XlsxStore::init(path, registry, false)?;
    tracing::info!("created workbook {}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
