use anyhow::Context;
use colored::Colorize;
use notary_sdk::{
    format_file_size, format_timestamp, Notary, NotaryConfig, SdkError, TimestampRecord,
};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let json = matches!(cli.format, OutputFormat::Json);
    if let Command::Config(_) = cli.command {
        return cmd_config(&config, json);
    }

    let mut notary = Notary::open(config)
        .with_context(|| format!("failed to open notary state in {}", cli.data_dir.display()))?;

    match cli.command {
        Command::Connect(_) => cmd_connect(&mut notary, json).await,
        Command::Disconnect(_) => cmd_disconnect(&mut notary, json),
        Command::Status(_) => cmd_status(&notary, json),
        Command::Hash(args) => cmd_hash(&mut notary, args, json),
        Command::Stamp(args) => cmd_stamp(&mut notary, args, json).await,
        Command::Verify(args) => cmd_verify(&notary, args, json).await,
        Command::Show(args) => cmd_show(&notary, args, json),
        Command::List(args) => cmd_list(&notary, args, json),
        Command::Certificate(args) => cmd_certificate(&notary, args, json),
        Command::Config(_) => unreachable!("handled before opening state"),
    }
}

/// Defaults, overlaid by `<data-dir>/notary.toml`, overlaid by flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<NotaryConfig> {
    let path = cli.data_dir.join(NotaryConfig::FILE_NAME);
    let mut config = NotaryConfig::load(&path)?;
    config.data_dir = cli.data_dir.clone();
    if cli.instant {
        config = config.instant();
    }
    debug!(
        data_dir = %config.data_dir.display(),
        network = %config.network,
        instant = cli.instant,
        "resolved configuration"
    );
    Ok(config)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_record(record: &TimestampRecord) {
    println!("  Timestamp ID:  {}", record.id.to_string().yellow().bold());
    println!("  SHA-256:       {}", record.digest);
    println!("  Principal:     {}", record.principal.as_str().cyan());
    println!(
        "  File:          {} ({})",
        record.filename,
        format_file_size(record.filesize_bytes)
    );
    println!("  Date/Time:     {}", format_timestamp(&record.created_at));
    println!("  Block height:  {}", record.ledger_height);
    println!("  Canister ID:   {}", record.registry_id.dimmed());
}

async fn cmd_connect(notary: &mut Notary, json: bool) -> anyhow::Result<()> {
    if let Some(principal) = notary.principal() {
        if json {
            return print_json(&json!({ "principal": principal, "connected": true }));
        }
        println!("Already connected as {}", principal.as_str().cyan());
        return Ok(());
    }
    if !json {
        println!("Connecting to identity provider...");
    }
    let principal = notary.connect().await;
    if json {
        return print_json(&json!({ "principal": principal, "connected": true }));
    }
    println!("{} Connected", "✓".green().bold());
    println!("  Principal: {}", principal.as_str().cyan());
    Ok(())
}

fn cmd_disconnect(notary: &mut Notary, json: bool) -> anyhow::Result<()> {
    let previous = notary.disconnect();
    if json {
        return print_json(&json!({ "disconnected": previous }));
    }
    match previous {
        Some(p) => println!("Disconnected {}", p.short_id().cyan()),
        None => println!("No identity was connected."),
    }
    Ok(())
}

fn cmd_status(notary: &Notary, json: bool) -> anyhow::Result<()> {
    let config = notary.config();
    if json {
        return print_json(&json!({
            "connected": notary.is_connected(),
            "principal": notary.principal(),
            "network": config.network,
            "canisterId": config.registry_id,
            "records": notary.records().len(),
            "dataDir": config.data_dir,
        }));
    }
    match notary.principal() {
        Some(p) => println!("Connected as {}", p.as_str().cyan()),
        None => println!("{}", "Not connected".yellow()),
    }
    println!("Network: {}", config.network.bold());
    println!("Canister: {}", config.registry_id.dimmed());
    println!("Registry: {} records", notary.records().len().to_string().bold());
    println!("State: {}", config.data_dir.display());
    Ok(())
}

fn cmd_hash(notary: &mut Notary, args: HashArgs, json: bool) -> anyhow::Result<()> {
    let selected = notary
        .select_path(&args.path)
        .with_context(|| format!("failed to hash {}", args.path.display()))?;
    if json {
        return print_json(&json!({
            "filename": selected.filename,
            "filesize": selected.filesize_bytes,
            "hash": selected.digest,
        }));
    }
    println!("{}  {}", selected.digest, selected.filename);
    println!("  Size: {}", format_file_size(selected.filesize_bytes));
    Ok(())
}

async fn cmd_stamp(notary: &mut Notary, args: StampArgs, json: bool) -> anyhow::Result<()> {
    if !notary.is_connected() {
        return Err(SdkError::NotConnected).context("run `notary connect` first");
    }
    notary
        .select_path(&args.path)
        .with_context(|| format!("failed to hash {}", args.path.display()))?;
    if !json {
        println!("Registering timestamp on the ledger...");
    }
    let record = notary.stamp().await?;
    if !notary.is_persisted() {
        eprintln!(
            "{} registry could not be saved; this record exists only for this run",
            "warning:".yellow().bold()
        );
    }
    if json {
        return print_json(&serde_json::to_value(&record)?);
    }
    println!("{} Timestamp registered", "✓".green().bold());
    print_record(&record);
    Ok(())
}

async fn cmd_verify(notary: &Notary, args: VerifyArgs, json: bool) -> anyhow::Result<()> {
    if !json {
        println!("Verifying on the ledger...");
    }
    let (found, history) = match (&args.digest, &args.file) {
        (Some(digest), _) => {
            let found = notary.verify(digest).await?;
            let history = if args.all { notary.history(digest)? } else { Vec::new() };
            (found, history)
        }
        (None, Some(path)) => {
            let found = notary
                .verify_path(path)
                .await
                .with_context(|| format!("failed to hash {}", path.display()))?;
            (found, Vec::new())
        }
        (None, None) => unreachable!("clap requires a digest or --file"),
    };

    if json {
        let mut value = json!({ "verified": found.is_some(), "record": found });
        if args.all {
            value["history"] = serde_json::to_value(&history)?;
        }
        return print_json(&value);
    }
    match found {
        Some(record) => {
            println!("{} Document verified", "✓".green().bold());
            print_record(&record);
            if history.len() > 1 {
                println!("\n{} registrations of this digest:", history.len());
                for r in &history {
                    println!("  {} {}", r.id.to_string().yellow(), format_timestamp(&r.created_at));
                }
            }
        }
        None => {
            println!("{} Document not found", "✗".red().bold());
            println!("  The digest is not registered in this notary. Check that it was");
            println!("  copied in full and that the document was registered here.");
        }
    }
    Ok(())
}

fn cmd_show(notary: &Notary, args: ShowArgs, json: bool) -> anyhow::Result<()> {
    let record = notary
        .record(&args.id)
        .ok_or_else(|| SdkError::RecordNotFound(args.id.clone()))?;
    if json {
        return print_json(&serde_json::to_value(record)?);
    }
    print_record(record);
    Ok(())
}

fn cmd_list(notary: &Notary, args: ListArgs, json: bool) -> anyhow::Result<()> {
    let records = notary.records();
    let shown = &records[records.len().saturating_sub(args.limit)..];
    if json {
        return print_json(&serde_json::to_value(shown)?);
    }
    if records.is_empty() {
        println!("No timestamps registered.");
        return Ok(());
    }
    for (i, record) in shown.iter().enumerate() {
        if args.oneline {
            println!(
                "{} {} {}",
                record.id.to_string().yellow(),
                record.digest.short_hex().dimmed(),
                record.filename
            );
        } else {
            if i > 0 {
                println!();
            }
            print_record(record);
        }
    }
    if let Some(note) = truncation_note(shown.len(), records.len()) {
        println!("{}", note.dimmed());
    }
    Ok(())
}

/// Footer for a listing limited by `-n`; `None` when every record is shown.
fn truncation_note(shown: usize, total: usize) -> Option<String> {
    (shown < total).then(|| format!("({shown} of {total} records shown)"))
}

fn cmd_certificate(notary: &Notary, args: CertificateArgs, json: bool) -> anyhow::Result<()> {
    let record = notary.certificate(&args.id)?;
    if json {
        return print_json(&json!({ "id": record.id, "exported": false }));
    }
    println!(
        "Record {} found; certificate export is not available in this build.",
        record.id.to_string().yellow()
    );
    Ok(())
}

fn cmd_config(config: &NotaryConfig, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::to_value(config)?);
    }
    print!("{}", config.to_toml_string()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(dir: &std::path::Path, extra: &[&str]) -> Cli {
        let mut argv = vec!["notary", "--data-dir", dir.to_str().unwrap()];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn config_file_in_data_dir_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(NotaryConfig::FILE_NAME),
            "network = \"ic\"\nregister_delay_ms = 10\n",
        )
        .unwrap();
        let config = resolve_config(&parse(dir.path(), &["status"])).unwrap();
        assert_eq!(config.network, "ic");
        assert_eq!(config.register_delay_ms, 10);
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn instant_flag_overrides_file_delays() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(NotaryConfig::FILE_NAME), "connect_delay_ms = 50\n").unwrap();
        let config = resolve_config(&parse(dir.path(), &["--instant", "connect"])).unwrap();
        assert_eq!(config.connect_delay_ms, 0);
    }

    #[test]
    fn truncation_note_only_when_records_hidden() {
        assert_eq!(truncation_note(3, 3), None);
        assert_eq!(truncation_note(0, 0), None);
        assert_eq!(truncation_note(0, 2).as_deref(), Some("(0 of 2 records shown)"));
        assert_eq!(truncation_note(20, 25).as_deref(), Some("(20 of 25 records shown)"));
    }

    #[tokio::test]
    async fn list_with_zero_limit_succeeds_on_populated_registry() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.txt");
        std::fs::write(&doc, b"hello").unwrap();
        let data = dir.path().join("state");
        let data = data.to_str().unwrap();
        let run = |args: &[&str]| {
            let mut argv = vec!["notary", "--instant", "--data-dir", data];
            argv.extend_from_slice(args);
            run_command(Cli::try_parse_from(argv).unwrap())
        };

        run(&["connect"]).await.unwrap();
        run(&["stamp", doc.to_str().unwrap()]).await.unwrap();
        run(&["list", "-n", "0"]).await.unwrap();
        run(&["--format", "json", "list", "-n", "0"]).await.unwrap();
    }

    #[tokio::test]
    async fn stamp_then_verify_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.txt");
        std::fs::write(&doc, b"hello").unwrap();
        let data = dir.path().join("state");
        let data = data.to_str().unwrap();

        let run = |args: &[&str]| {
            let mut argv = vec!["notary", "--instant", "--data-dir", data];
            argv.extend_from_slice(args);
            run_command(Cli::try_parse_from(argv).unwrap())
        };

        assert!(run(&["stamp", doc.to_str().unwrap()]).await.is_err());
        run(&["connect"]).await.unwrap();
        run(&["stamp", doc.to_str().unwrap()]).await.unwrap();
        run(&["verify", "--file", doc.to_str().unwrap()]).await.unwrap();
        run(&["list", "--oneline"]).await.unwrap();

        let notary = Notary::open(NotaryConfig {
            data_dir: data.into(),
            ..NotaryConfig::default()
        })
        .unwrap();
        assert_eq!(notary.records().len(), 1);
        assert!(notary.is_connected());
        assert!(run(&["show", "TS-MISSING-000000"]).await.is_err());
    }
}
