//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;

fn parse_cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

fn parse(args: &[&str]) -> CliCommand {
    parse_cli(args).command
}

#[test]
fn cli_parse_shorten() {
    match parse(&["urishort", "shorten", "example.com/a", "ethereum:0xabc"]) {
        CliCommand::Shorten { uris } => assert_eq!(uris, ["example.com/a", "ethereum:0xabc"]),
        other => panic!("expected Shorten, got {:?}", other),
    }
}

#[test]
fn cli_parse_shorten_requires_uri() {
    assert!(Cli::try_parse_from(["urishort", "shorten"]).is_err());
}

#[test]
fn cli_parse_resolve() {
    match parse(&["urishort", "resolve", "aB3xYz"]) {
        CliCommand::Resolve { id, text } => {
            assert_eq!(id, "aB3xYz");
            assert!(!text);
        }
        other => panic!("expected Resolve, got {:?}", other),
    }
    match parse(&["urishort", "resolve", "--text", "aB3xYz"]) {
        CliCommand::Resolve { text, .. } => assert!(text),
        other => panic!("expected Resolve, got {:?}", other),
    }
}

#[test]
fn cli_parse_status_normalize_digest() {
    assert!(matches!(parse(&["urishort", "status"]), CliCommand::Status));
    match parse(&["urishort", "normalize", "例子.com"]) {
        CliCommand::Normalize { uri } => assert_eq!(uri, "例子.com"),
        other => panic!("expected Normalize, got {:?}", other),
    }
    match parse(&["urishort", "digest", "example.com"]) {
        CliCommand::Digest { uri } => assert_eq!(uri, "example.com"),
        other => panic!("expected Digest, got {:?}", other),
    }
}

#[test]
fn cli_parse_global_flags() {
    let cli = parse_cli(&["urishort", "--ephemeral", "status"]);
    assert!(cli.ephemeral);
    assert!(cli.config.is_none());

    let cli = parse_cli(&["urishort", "shorten", "--config", "/tmp/u.toml", "example.com"]);
    assert!(!cli.ephemeral);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/u.toml")));
}

#[test]
fn cli_rejects_unknown_command() {
    assert!(Cli::try_parse_from(["urishort", "add", "x"]).is_err());
}

mod store {
    use super::super::{open_service, CliStore};
    use urishort_core::config::ShortenerConfig;
    use urishort_core::ServiceStatus;

    #[tokio::test]
    async fn ephemeral_uses_memory_store() {
        let service = open_service(ShortenerConfig::default(), true).await.unwrap();
        assert!(matches!(service.store(), CliStore::Memory(_)));
        let created = service.create("example.com").await.unwrap();
        let got = service.retrieve(created.id.as_str()).await.unwrap();
        assert_eq!(got.raw_uri, "https://example.com");
    }

    #[tokio::test]
    async fn default_opens_configured_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("uri.db");
        let mut cfg = ShortenerConfig::default();
        cfg.database.path = Some(db_path.clone());

        let service = open_service(cfg, false).await.unwrap();
        assert!(matches!(service.store(), CliStore::Sqlite(_)));
        assert_eq!(service.status().await, ServiceStatus::Operational);
        service.create("example.com/x").await.unwrap();
        assert!(db_path.exists());
    }
}
