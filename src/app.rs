use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::core::{
    alerts::sinks::{ChatBroadcast, Sinks},
    config::ConfigManager,
    coordinator::Coordinator,
    error::{IngestError, SinkError},
    lang::Localization,
    log_io::DurableLog,
    model::SimEvent,
    ownership::OwnershipArbiter,
};

/// Prints chat broadcasts to stdout.
struct StdoutChat;

impl ChatBroadcast for StdoutChat {
    fn broadcast(&self, text: &str, _icon_id: u64) -> Result<(), SinkError> {
        println!("{}", text);
        Ok(())
    }
}

/// One JSON event per line; blank lines are skipped.
pub fn parse_event(line: &str) -> Result<Option<SimEvent>, IngestError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

/// Forward every parseable line from `input` to `tx`. Bytes that are not
/// valid UTF-8 are replaced, so a bad line is skipped like any other
/// malformed event instead of ending the stream.
pub async fn forward_events<R: AsyncBufRead + Unpin>(
    mut input: R,
    tx: mpsc::Sender<SimEvent>,
) -> Result<(), IngestError> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        match parse_event(&String::from_utf8_lossy(&buf)) {
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("Skipping input line: {}", e),
        }
    }
}

/// Drain `rx` into the coordinator. Deferred notifications get one yield
/// to settle and always run before the next event is taken.
pub async fn event_loop<L: Localization>(coordinator: &mut Coordinator<L>, mut rx: mpsc::Receiver<SimEvent>) {
    while let Some(event) = rx.recv().await {
        coordinator.handle(event);
        tokio::task::yield_now().await;
        coordinator.tick();
    }
    coordinator.tick();
}

fn resolve_path(config_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config_dir.join(path)
    }
}

/// Read events from stdin until EOF and turn them into notifications.
pub fn run(config_dir: PathBuf) -> Result<(), IngestError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(config_dir))
}

async fn serve(config_dir: PathBuf) -> Result<(), IngestError> {
    let config = ConfigManager::new(&config_dir);
    let settings = config.load_or_init();
    let catalog = config.load_catalog();

    let log_path = resolve_path(&config_dir, &settings.logging.file_path);
    let sinks = Sinks::default()
        .with_chat(StdoutChat)
        .with_log(DurableLog::new(log_path));

    let mut coordinator = Coordinator::new(settings, sinks, OwnershipArbiter::default(), catalog);

    let (tx, rx) = mpsc::channel(32);
    let reader = tokio::spawn(forward_events(BufReader::new(tokio::io::stdin()), tx));

    log::info!("Listening for events on stdin. Config: {:?}", config_dir);
    event_loop(&mut coordinator, rx).await;

    match reader.await {
        Ok(result) => result,
        Err(e) => {
            log::error!("Input reader crashed: {}", e);
            Ok(())
        }
    }
}
