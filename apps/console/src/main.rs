use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, ConsoleClient, ConsoleConfig, OfferedFile, RemoteApi, DEFAULT_CONFIG_FILE,
};
use console_ui::{
    backend_bridge::{commands::BackendCommand, runtime},
    controller::{
        baseline_list::ListGeneration, events::UiEvent, part_import::ImportDialogOptions,
    },
    reduce, BaselinePanelController, ConsoleScreen, NotificationLog, PartImportController,
};
use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const EVENT_WAIT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "console", about = "Product console: baselines and part import")]
struct Cli {
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    workspace: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Product ids matching QUERY, as the product-id autocomplete would offer them.
    Products { query: Option<String> },
    /// Baselines of every product, or of one product.
    Baselines {
        #[arg(long)]
        product: Option<String>,
    },
    /// Stages FILE(s) in the import dialog and submits the last one.
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Offer the files as a drop instead of a file-picker selection.
        #[arg(long)]
        drop: bool,
        #[arg(long)]
        single_file: bool,
        #[arg(long)]
        auto_checkout: bool,
        #[arg(long)]
        auto_checkin: bool,
        #[arg(long)]
        permissive_update: bool,
        #[arg(long)]
        revision_note: Option<String>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    let mut config = load_settings(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    if let Some(server_url) = cli.server_url {
        config.server_url = server_url;
    }
    if let Some(workspace) = cli.workspace {
        config.workspace_id = workspace;
    }
    let config = Arc::new(config);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let api: Arc<dyn RemoteApi> = Arc::new(ConsoleClient::new(ConsoleConfig::clone(&config)));
    let worker = runtime::launch(cmd_rx, ui_tx, api);

    let mut screen = ConsoleScreen::default();
    let outcome = match cli.command {
        Command::Products { query } => {
            list_products(&mut screen, &config, cmd_tx, &ui_rx, query.as_deref().unwrap_or(""))
        }
        Command::Baselines { product } => {
            list_baselines(&mut screen, &config, cmd_tx, &ui_rx, product.as_deref())
        }
        Command::Import {
            files,
            drop: as_drop,
            single_file,
            auto_checkout,
            auto_checkin,
            permissive_update,
            revision_note,
        } => {
            let mut importer = PartImportController::new(
                Arc::clone(&config),
                cmd_tx,
                NotificationLog::new(),
                ImportDialogOptions { single_file },
            );
            importer.render();
            let form = importer.form_mut();
            form.set_auto_checkout(auto_checkout);
            if auto_checkin && !form.set_auto_checkin(true) {
                warn!("--auto-checkin needs --auto-checkout; ignoring it");
            }
            form.set_permissive_update(permissive_update);
            if let Some(note) = revision_note {
                form.set_revision_note_enabled(true);
                form.set_revision_note(note);
            }

            let offered = files.into_iter().map(OfferedFile::from_path).collect();
            if as_drop {
                importer.on_drag_over();
                importer.on_drop(offered);
            } else {
                importer.on_files_selected(offered);
            }
            screen.importer = Some(importer);
            import_part(&mut screen, &ui_rx)
        }
    };

    drop(screen);
    worker
        .join()
        .map_err(|_| anyhow!("backend worker panicked"))?;
    outcome
}

fn list_products(
    screen: &mut ConsoleScreen,
    config: &Arc<ConsoleConfig>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: &Receiver<UiEvent>,
    query: &str,
) -> Result<()> {
    let mut panel =
        BaselinePanelController::new(Arc::clone(config), cmd_tx, NotificationLog::new());
    panel.render();
    panel.on_product_query(query);
    screen.panel = Some(panel);

    pump(ui_rx, screen, |event| {
        matches!(
            event,
            UiEvent::ProductsListed { query: answered, .. }
                | UiEvent::ProductQueryFailed { query: answered, .. } if answered == query
        )
    })?;

    if let Some(panel) = &screen.panel {
        panel
            .product_suggestions()
            .iter()
            .for_each(|id| println!("{id}"));
    }
    Ok(())
}

fn list_baselines(
    screen: &mut ConsoleScreen,
    config: &Arc<ConsoleConfig>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: &Receiver<UiEvent>,
    product: Option<&str>,
) -> Result<()> {
    let mut panel =
        BaselinePanelController::new(Arc::clone(config), cmd_tx, NotificationLog::new());
    panel.render();
    if let Some(product) = product {
        panel.on_product_filter_changed(product);
    }
    let generation = panel
        .list()
        .map(|list| list.generation())
        .unwrap_or(ListGeneration(0));
    screen.panel = Some(panel);

    pump(ui_rx, screen, |event| match event {
        UiEvent::BaselinesLoaded { generation: g, .. }
        | UiEvent::BaselinesFailed { generation: g, .. } => *g == generation,
        _ => false,
    })?;

    let Some(list) = screen.panel.as_ref().and_then(|panel| panel.list()) else {
        bail!("baseline list was never mounted");
    };
    for row in list.rows() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.id,
            row.name,
            row.configuration_item_id,
            row.kind.as_str(),
            row.creation_date
                .map(|date| date.to_rfc3339())
                .unwrap_or_else(|| "-".into()),
        );
    }
    Ok(())
}

fn import_part(screen: &mut ConsoleScreen, ui_rx: &Receiver<UiEvent>) -> Result<()> {
    let Some(importer) = screen.importer.as_mut() else {
        bail!("import dialog is not open");
    };
    let submitted = importer.submit();
    let in_flight = importer.in_flight().map(str::to_string);
    print_notifications(screen);
    let Some(file_name) = in_flight.filter(|_| submitted) else {
        bail!("nothing was submitted");
    };

    pump(ui_rx, screen, |event| {
        matches!(event, UiEvent::PartImportFinished { file_name: done, .. } if *done == file_name)
    })?;

    let completion = screen
        .importer
        .as_ref()
        .and_then(PartImportController::completion)
        .ok_or_else(|| anyhow!("import of {file_name} never completed"))?;
    match &completion.result {
        Ok(()) => {
            println!("imported {}", completion.file_name);
            Ok(())
        }
        Err(err) if err.requires_reauth() => bail!(
            "import of {} was refused; check the workspace credentials: {}",
            completion.file_name,
            err.display_message()
        ),
        Err(err) => bail!(
            "import of {} failed: {}",
            completion.file_name,
            err.display_message()
        ),
    }
}

/// Feeds backend events to the screen until `until` matches one, printing
/// notifications as they are posted.
fn pump(
    ui_rx: &Receiver<UiEvent>,
    screen: &mut ConsoleScreen,
    mut until: impl FnMut(&UiEvent) -> bool,
) -> Result<()> {
    let deadline = Instant::now() + EVENT_WAIT;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let event = ui_rx
            .recv_timeout(remaining)
            .map_err(|err| anyhow!("no answer from backend worker: {err}"))?;
        let finished = until(&event);
        if let Some(unhandled) = reduce(screen, event) {
            debug!(?unhandled, "event without a mounted controller");
        }
        print_notifications(screen);
        if finished {
            return Ok(());
        }
    }
}

fn print_notifications(screen: &mut ConsoleScreen) {
    let logs = screen
        .panel
        .as_mut()
        .map(|panel| panel.notifications_mut())
        .into_iter()
        .chain(screen.importer.as_mut().map(|importer| importer.notifications_mut()));
    for log in logs {
        for notification in log.drain() {
            eprintln!("[{}] {}", notification.kind, notification.message);
        }
    }
}
