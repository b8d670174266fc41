use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "symdex",
    about = "symdex: debug-symbol package indexer",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file (defaults to ./symdex.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a symbol package and store its debug symbols
    Index(IndexArgs),
    /// Print the storage key of a portable PDB
    Key(KeyArgs),
    /// List the entries of a symbol package
    Entries(EntriesArgs),
}

#[derive(Args)]
pub struct IndexArgs {
    pub package: PathBuf,
    /// Override the symbol store root
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// Override the package catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Args)]
pub struct KeyArgs {
    pub pdb: PathBuf,
}

#[derive(Args)]
pub struct EntriesArgs {
    pub package: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_index() {
        let cli = Cli::try_parse_from(["symdex", "index", "MyLib.1.0.0.snupkg"]).unwrap();
        if let Command::Index(args) = cli.command {
            assert_eq!(args.package, PathBuf::from("MyLib.1.0.0.snupkg"));
            assert!(args.store.is_none());
            assert!(args.catalog.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_index_overrides() {
        let cli = Cli::try_parse_from([
            "symdex", "index", "p.snupkg", "--store", "/srv/symbols", "--catalog", "packages.json",
        ])
        .unwrap();
        if let Command::Index(args) = cli.command {
            assert_eq!(args.store, Some(PathBuf::from("/srv/symbols")));
            assert_eq!(args.catalog, Some(PathBuf::from("packages.json")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_key() {
        let cli = Cli::try_parse_from(["symdex", "key", "MyLib.pdb"]).unwrap();
        if let Command::Key(args) = cli.command {
            assert_eq!(args.pdb, PathBuf::from("MyLib.pdb"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_entries() {
        let cli = Cli::try_parse_from(["symdex", "entries", "p.snupkg"]).unwrap();
        assert!(matches!(cli.command, Command::Entries(_)));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "symdex", "key", "a.pdb", "-v", "--format", "json", "--config", "symdex.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("symdex.toml")));
    }

    #[test]
    fn default_format_is_text() {
        let cli = Cli::try_parse_from(["symdex", "entries", "p.snupkg"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.verbose);
    }

    #[test]
    fn index_requires_package() {
        assert!(Cli::try_parse_from(["symdex", "index"]).is_err());
    }

    #[test]
    fn unknown_command_fails() {
        assert!(Cli::try_parse_from(["symdex", "serve"]).is_err());
    }
}
