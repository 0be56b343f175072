//! `networqr` - CLI for networqr
//!
//! This binary saves contact details locally and turns them into QR codes.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, info, warn};

use networqr::cli::{
    Cli, Command, ConfigCommand, GenerateCommand, GenerateFormat, LinkCommand, SaveCommand,
    ShowCommand,
};
use networqr::render::to_terminal_string;
use networqr::{
    build_transfer_params, forget_contact, init_logging, load_stored_contact, try_save_contact,
    ChannelEncoder, ChannelImage, Config, ContactRecord, KeyValueStore, MemoryStore, PhonePolicy,
    QrBoard, QrPngEncoder, SqliteStore, TransferParams,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config =
        Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    // Execute the command
    match cli.command {
        Command::Save(cmd) => handle_save(open_store(&config).as_ref(), &config, cmd).await,
        Command::Show(cmd) => handle_show(open_store(&config).as_ref(), &cmd),
        Command::Link(cmd) => handle_link(open_store(&config).as_ref(), &config, cmd),
        Command::Generate(cmd) => {
            handle_generate(open_store(&config).as_ref(), &config, cmd).await
        }
        Command::Forget => handle_forget(open_store(&config).as_ref()),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Open the contact store, falling back to a store that keeps nothing.
///
/// Without a usable store the tool still generates codes; details just
/// aren't remembered.
fn open_store(config: &Config) -> Box<dyn KeyValueStore> {
    let path = config.database_path();
    match SqliteStore::open(&path) {
        Ok(store) => {
            debug!("Using contact store at {}", path.display());
            Box::new(store)
        }
        Err(e) => {
            warn!(
                "Contact store unavailable ({}); details will not be kept",
                e
            );
            Box::new(MemoryStore::disabled())
        }
    }
}

fn check_required(config: &Config, record: &ContactRecord) -> anyhow::Result<()> {
    if config.contact.require_phone {
        record
            .ensure_phone()
            .context("a phone number is required by contact.require_phone")?;
    }
    Ok(())
}

async fn handle_save(
    store: &dyn KeyValueStore,
    config: &Config,
    cmd: SaveCommand,
) -> anyhow::Result<()> {
    let record = ContactRecord::new(cmd.name, cmd.linkedin, cmd.phone)?;
    check_required(config, &record)?;

    match try_save_contact(store, &record) {
        Ok(()) => println!("Saved details for {}.", record.full_name()),
        Err(e) => {
            warn!("Could not save contact details: {}", e);
            println!("Details for {} were not saved.", record.full_name());
        }
    }

    let link = build_transfer_params(&record).link(&config.output.link_base);
    println!("Link: {link}");

    if cmd.generate {
        println!();
        let policy = config.contact.phone_policy;
        generate(config, record, policy, None, GenerateFormat::Files).await?;
    }
    Ok(())
}

fn handle_show(store: &dyn KeyValueStore, cmd: &ShowCommand) -> anyhow::Result<()> {
    let record = load_stored_contact(store);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    match record {
        Some(record) => println!("{record}"),
        None => println!("No saved details."),
    }
    Ok(())
}

fn handle_link(store: &dyn KeyValueStore, config: &Config, cmd: LinkCommand) -> anyhow::Result<()> {
    let Some(record) = load_stored_contact(store) else {
        bail!("no saved details; run `networqr save` first");
    };

    let base = cmd.base.unwrap_or_else(|| config.output.link_base.clone());
    println!("{}", build_transfer_params(&record).link(&base));
    Ok(())
}

fn handle_forget(store: &dyn KeyValueStore) -> anyhow::Result<()> {
    if forget_contact(store).context("failed to clear saved details")? {
        println!("Saved details removed.");
    } else {
        println!("No saved details.");
    }
    Ok(())
}

async fn handle_generate(
    store: &dyn KeyValueStore,
    config: &Config,
    cmd: GenerateCommand,
) -> anyhow::Result<()> {
    let record = resolve_contact(store, &cmd)?;
    check_required(config, &record)?;

    let policy = cmd
        .phone_policy
        .map_or(config.contact.phone_policy, PhonePolicy::from);
    generate(config, record, policy, cmd.output, cmd.format).await
}

/// Pick the contact to encode: a link, inline arguments, or the saved one.
fn resolve_contact(
    store: &dyn KeyValueStore,
    cmd: &GenerateCommand,
) -> anyhow::Result<ContactRecord> {
    if !cmd.has_inline_contact() {
        return load_stored_contact(store).context(
            "no saved details; run `networqr save` or pass --name and --linkedin",
        );
    }

    if let Some(link) = &cmd.from_link {
        return TransferParams::parse(link)
            .to_contact()
            .context("link does not carry usable contact details");
    }

    let name = cmd.name.clone().unwrap_or_default();
    let linkedin = cmd.linkedin.clone().unwrap_or_default();
    Ok(ContactRecord::new(name, linkedin, cmd.phone.clone())?)
}

async fn generate(
    config: &Config,
    record: ContactRecord,
    policy: PhonePolicy,
    output: Option<PathBuf>,
    format: GenerateFormat,
) -> anyhow::Result<()> {
    let encoder = ChannelEncoder::new(QrPngEncoder::new(), config.render.clone(), policy);
    let mut board = QrBoard::new();
    let mut stream = encoder.encode_board(&mut board, record);
    while let Some(update) = stream.next().await {
        match &update.image {
            ChannelImage::Ready(_) => info!("{} QR code ready", update.kind.label()),
            ChannelImage::Failed(reason) => {
                info!("{} QR code failed: {}", update.kind.label(), reason);
            }
            ChannelImage::Pending => {}
        }
        board.apply(update);
    }

    match format {
        GenerateFormat::Files => {
            let dir = output.unwrap_or_else(|| config.output.directory.clone());
            write_files(&board, &dir)?;
        }
        GenerateFormat::DataUrl => {
            for channel in board.channels() {
                println!("{} ({})", channel.label, channel.display);
                match channel.image.image() {
                    Some(image) => println!("{}", image.to_data_url()),
                    None => println!("[{}]", channel.image.status()),
                }
                println!();
            }
        }
        GenerateFormat::Terminal => {
            for channel in board.channels() {
                println!("{}", channel.label);
                if channel.image.image().is_some() {
                    println!(
                        "{}",
                        to_terminal_string(&channel.payload, config.render.error_correction)?
                    );
                } else {
                    println!("[{}]", channel.image.status());
                }
                println!("{}", channel.display);
                println!();
            }
        }
        GenerateFormat::Json => {
            let out = serde_json::json!({
                "name": board.record().map(ContactRecord::full_name),
                "generation": board.generation().value(),
                "channels": board.channels(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    let failed = board
        .channels()
        .iter()
        .filter(|c| c.image.image().is_none())
        .count();
    if failed > 0 {
        bail!("{failed} QR code(s) could not be generated");
    }
    Ok(())
}

fn write_files(board: &QrBoard, dir: &std::path::Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    if let Some(record) = board.record() {
        println!("QR codes for {}", record.full_name());
    }
    for channel in board.channels() {
        match channel.image.image() {
            Some(image) => {
                let path = dir.join(format!("{}.png", channel.kind.slug()));
                image
                    .write_png(&path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("  {:<18} {}", channel.label, path.display());
            }
            None => println!("  {:<18} [{}]", channel.label, channel.image.status()),
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Render]");
                println!("  Width:              {}", config.render.width);
                println!("  Margin:             {}", config.render.margin);
                println!("  Dark:               {}", config.render.dark);
                println!("  Light:              {}", config.render.light);
                println!(
                    "  Error correction:   {:?}",
                    config.render.error_correction
                );
                println!();
                println!("[Contact]");
                println!("  Require phone:      {}", config.contact.require_phone);
                println!("  Phone policy:       {}", config.contact.phone_policy);
                println!();
                println!("[Output]");
                println!(
                    "  Directory:          {}",
                    config.output.directory.display()
                );
                println!("  Link base:          {}", config.output.link_base);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
