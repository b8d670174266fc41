use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use symdex_archive::{PackageArchive, SymbolPackage};
use symdex_catalog::InMemoryPackageCatalog;
use symdex_indexer::{is_allowed, SymbolIndexingService};
use symdex_pdb::read_pdb_id;
use symdex_store::FileSystemSymbolStore;
use symdex_types::{CancellationToken, ValidationResult};
use tracing::{info, warn};

use crate::cli::*;
use crate::config::SymdexConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = SymdexConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Index(args) => cmd_index(config, args, cli.format),
        Command::Key(args) => cmd_key(args, cli.format),
        Command::Entries(args) => cmd_entries(args, cli.format),
    }
}

fn cmd_index(
    mut config: SymdexConfig,
    args: IndexArgs,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    if let Some(root) = args.store {
        config.store.root = root;
    }
    if let Some(path) = args.catalog {
        config.catalog.path = Some(path);
    }

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let result = runtime.block_on(index_package(&config, &args.package))?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "package": args.package.display().to_string(), "result": result })
        ),
        OutputFormat::Text => match result {
            ValidationResult::Success => println!(
                "{} Indexed {} into {}",
                "✓".green().bold(),
                args.package.display().to_string().bold(),
                config.store.root.display()
            ),
            ValidationResult::PackageNotFound => println!(
                "{} {}: no published package matches",
                "✗".red().bold(),
                args.package.display()
            ),
            ValidationResult::InvalidSymbolPackage => println!(
                "{} {}: invalid symbol package",
                "✗".red().bold(),
                args.package.display()
            ),
        },
    }

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Run one indexing call against the configured catalog and store.
/// Ctrl-C cancels the call.
pub async fn index_package(
    config: &SymdexConfig,
    package: &Path,
) -> anyhow::Result<ValidationResult> {
    let catalog = match &config.catalog.path {
        Some(path) => InMemoryPackageCatalog::from_json_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => {
            warn!("no catalog configured; every package will be reported as not found");
            InMemoryPackageCatalog::new()
        }
    };
    let store = FileSystemSymbolStore::new(&config.store.root)
        .with_chunk_size(config.indexer.copy_chunk_size);
    let service = SymbolIndexingService::new(
        Arc::new(catalog),
        Arc::new(store),
        config.indexer.clone(),
    );

    let mut file =
        File::open(package).with_context(|| format!("opening {}", package.display()))?;

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, cancelling");
                cancel.cancel();
            }
        })
    };

    let outcome = service.index(&mut file, &cancel).await;
    interrupt.abort();
    outcome.context("indexing cancelled")
}

fn cmd_key(args: KeyArgs, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let file = File::open(&args.pdb).with_context(|| format!("opening {}", args.pdb.display()))?;
    let id = read_pdb_id(&mut BufReader::new(file))
        .with_context(|| format!("reading {}", args.pdb.display()))?;
    let key = id.symbol_key();

    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "file": args.pdb.display().to_string(),
                "guid": id.guid.to_string(),
                "stamp": id.stamp,
                "key": key.as_str(),
            })
        ),
        OutputFormat::Text => {
            println!("{}", key.as_str().yellow().bold());
            println!("  GUID:  {}", id.guid.to_string().cyan());
            println!("  Stamp: {:#010x}", id.stamp);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_entries(args: EntriesArgs, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let file = File::open(&args.package)
        .with_context(|| format!("opening {}", args.package.display()))?;
    let mut package = SymbolPackage::open(BufReader::new(file))
        .with_context(|| format!("reading {}", args.package.display()))?;
    let entries = package.validate_entries()?;
    let manifest = package.manifest();

    match format {
        OutputFormat::Json => {
            let listing: Vec<_> = entries
                .iter()
                .map(|e| {
                    json!({
                        "path": e.path,
                        "size": e.size,
                        "extension": e.extension,
                        "allowed": is_allowed(e),
                        "symbol": e.is_symbol_file(),
                    })
                })
                .collect();
            let identity = manifest.as_ref().ok().map(|m| m.to_string());
            println!("{}", json!({ "package": identity, "entries": listing }));
        }
        OutputFormat::Text => {
            match &manifest {
                Ok(identity) => println!("Package {}", identity.to_string().bold()),
                Err(e) => println!("Package {} ({e})", "unknown".red()),
            }
            for entry in &entries {
                let verdict = if is_allowed(entry) { "✓".green() } else { "✗".red() };
                let path = if entry.is_symbol_file() {
                    entry.path.yellow()
                } else {
                    entry.path.normal()
                };
                println!("  {verdict} {path} {}", format!("({} bytes)", entry.size).dimmed());
            }
        }
    }

    let clean = manifest.is_ok() && entries.iter().all(is_allowed);
    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use symdex_archive::SymbolPackageBuilder;
    use symdex_pdb::PortablePdbBuilder;
    use uuid::Uuid;

    fn write_package(dir: &Path, extra: Option<(&str, Vec<u8>)>) -> PathBuf {
        let pdb = PortablePdbBuilder::new(Uuid::from_bytes([0xAA; 16])).build();
        let mut builder = SymbolPackageBuilder::new("MyLib", "1.0.0")
            .file("lib/net8.0/MyLib.dll.pdb", pdb);
        if let Some((path, content)) = extra {
            builder = builder.file(path, content);
        }
        let path = dir.join("MyLib.1.0.0.snupkg");
        std::fs::write(&path, builder.build().unwrap()).unwrap();
        path
    }

    fn config_for(dir: &Path, published: bool) -> SymdexConfig {
        let catalog = dir.join("packages.json");
        let records = if published {
            r#"[{"id": "MyLib", "version": "1.0.0"}]"#
        } else {
            "[]"
        };
        std::fs::write(&catalog, records).unwrap();
        let mut config = SymdexConfig::default();
        config.store.root = dir.join("symbols");
        config.catalog.path = Some(catalog);
        config
    }

    #[tokio::test]
    async fn index_writes_symbol_server_tree() {
        let dir = tempfile::tempdir().unwrap();
        let package = write_package(dir.path(), None);
        let config = config_for(dir.path(), true);

        let result = index_package(&config, &package).await.unwrap();
        assert_eq!(result, ValidationResult::Success);

        let stored = dir
            .path()
            .join("symbols")
            .join("mylib.dll.pdb")
            .join(format!("{}ffffffff", "AA".repeat(16)))
            .join("mylib.dll.pdb");
        assert!(stored.is_file());
    }

    #[tokio::test]
    async fn index_unpublished_package() {
        let dir = tempfile::tempdir().unwrap();
        let package = write_package(dir.path(), None);
        let config = config_for(dir.path(), false);

        let result = index_package(&config, &package).await.unwrap();
        assert_eq!(result, ValidationResult::PackageNotFound);
        assert!(!dir.path().join("symbols").exists());
    }

    #[tokio::test]
    async fn index_rejects_disallowed_content() {
        let dir = tempfile::tempdir().unwrap();
        let package = write_package(dir.path(), Some(("readme.txt", b"hi".to_vec())));
        let config = config_for(dir.path(), true);

        let result = index_package(&config, &package).await.unwrap();
        assert_eq!(result, ValidationResult::InvalidSymbolPackage);
    }

    #[tokio::test]
    async fn index_missing_package_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), true);
        assert!(index_package(&config, &dir.path().join("nope.snupkg")).await.is_err());
    }

    #[test]
    fn key_command_reads_pdb() {
        let dir = tempfile::tempdir().unwrap();
        let pdb = dir.path().join("MyLib.pdb");
        std::fs::write(&pdb, PortablePdbBuilder::new(Uuid::nil()).build()).unwrap();
        let code = cmd_key(KeyArgs { pdb }, OutputFormat::Json).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn key_command_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let pdb = dir.path().join("bad.pdb");
        std::fs::write(&pdb, b"nope").unwrap();
        assert!(cmd_key(KeyArgs { pdb }, OutputFormat::Text).is_err());
    }

    #[test]
    fn entries_command_flags_disallowed() {
        let dir = tempfile::tempdir().unwrap();
        let clean = write_package(dir.path(), None);
        assert_eq!(
            cmd_entries(EntriesArgs { package: clean }, OutputFormat::Text).unwrap(),
            ExitCode::SUCCESS
        );

        let dirty_dir = tempfile::tempdir().unwrap();
        let dirty = write_package(dirty_dir.path(), Some(("readme.txt", Vec::new())));
        assert_eq!(
            cmd_entries(EntriesArgs { package: dirty }, OutputFormat::Json).unwrap(),
            ExitCode::FAILURE
        );
    }
}
