//! Unit tests for CLI commands

use crate::cli::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_serve_command_with_flags() {
    let cli = Cli::try_parse_from([
        "kahless",
        "serve",
        "--config",
        "app.yaml",
        "--addr",
        "0.0.0.0:9000",
        "--static-dir",
        "assets",
    ])
    .unwrap();

    match cli.command {
        Commands::Serve { config, addr } => {
            assert_eq!(config.config, Some(PathBuf::from("app.yaml")));
            assert_eq!(config.static_dir, Some(PathBuf::from("assets")));
            assert_eq!(addr.as_deref(), Some("0.0.0.0:9000"));
        }
        Commands::Routes { .. } => panic!("Expected Serve command"),
    }
}

#[test]
fn test_flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.yaml");
    std::fs::write(&path, "templates_dir: from_file\nstatic_dir: from_file\n").unwrap();

    let cli = Cli::try_parse_from([
        "kahless",
        "routes",
        "--config",
        path.to_str().unwrap(),
        "--templates",
        "from_flag",
    ])
    .unwrap();

    let Commands::Routes { config } = cli.command else {
        panic!("Expected Routes command");
    };
    let loaded = config.load().unwrap();
    assert_eq!(loaded.templates_dir, PathBuf::from("from_flag"));
    assert_eq!(loaded.static_dir, Some(PathBuf::from("from_file")));
}

#[test]
fn test_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["kahless", "generate"]).is_err());
}
