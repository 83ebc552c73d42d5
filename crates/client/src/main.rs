use std::sync::{Arc, Mutex};

use sandbox_client::config::SyncConfig;
use sandbox_client::intent::IntentSubmitter;
use sandbox_client::reconciler::Reconciler;
use sandbox_client::transport::Transport;
use sandbox_client::{event_bus, presentation, tags};
use sandbox_world::{BlockPos, BlockStore, BlockType, OwnerKey};
use tokio::sync::broadcast;

#[tokio::main]
async fn main() {
    let demo_mode = std::env::args().any(|a| a == "--demo");
    let config = SyncConfig::from_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    if demo_mode {
        run_demo();
        return;
    }

    tracing::info!("Sandbox client -- mirroring world state from {}", config.server_url);

    let store = Arc::new(Mutex::new(BlockStore::new()));
    let (bus_tx, _) = broadcast::channel(event_bus::BUS_CAPACITY);

    // The presentation adapter subscribes before bootstrap so the initial
    // full-sync batch gets rendered too.
    tokio::spawn(presentation::run(bus_tx.subscribe()));

    let transport = match Transport::new(config.server_url.clone(), config.request_timeout) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            tracing::error!("Could not build HTTP transport: {:#}", e);
            std::process::exit(1);
        }
    };

    let reconciler = Reconciler::new(
        Arc::clone(&transport),
        Arc::clone(&store),
        bus_tx.clone(),
        &config,
    );

    // No world view, no client: bail out loudly instead of running empty.
    let server_key = match reconciler.bootstrap().await {
        Ok(key) => key,
        Err(e) => {
            tracing::error!("World sync initialization failed: {:#}", e);
            std::process::exit(1);
        }
    };

    let submitter = IntentSubmitter::new(
        Arc::clone(&transport),
        Arc::clone(&store),
        bus_tx.clone(),
        server_key.unwrap_or_default(),
    );

    tokio::select! {
        _ = reconciler.run() => {}
        _ = intent_console(submitter) => {
            tracing::info!("Input closed, shutting down...");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, shutting down...");
        }
    }
    // Dropping the runtime cancels the poll task and releases the HTTP pool.
}

/// Minimal stand-in for the engine's input/raycast layer: block intents as
/// stdin commands. `place x y z [type]` places, `remove x y z` clears.
async fn intent_console(submitter: IntentSubmitter) {
    use tokio::io::{AsyncBufReadExt, BufReader};

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            ["place", x, y, z, rest @ ..] if rest.len() <= 1 => {
                match parse_pos(x, y, z) {
                    Some(pos) => {
                        let kind = tags::resolve(rest.first().copied().unwrap_or("random"));
                        submitter.request_placement(pos, kind);
                    }
                    None => tracing::warn!("Bad coordinates in: {}", line),
                }
            }
            ["remove", x, y, z] => match parse_pos(x, y, z) {
                Some(pos) => submitter.request_removal(pos),
                None => tracing::warn!("Bad coordinates in: {}", line),
            },
            [] => {}
            _ => tracing::warn!(
                "Unrecognized command: {} (try `place x y z [type]` or `remove x y z`)",
                line,
            ),
        }
    }
}

fn parse_pos(x: &str, y: &str, z: &str) -> Option<BlockPos> {
    Some(BlockPos::new(x.parse().ok()?, y.parse().ok()?, z.parse().ok()?))
}

/// Offline exercise of the reconciliation store: a captured bootstrap
/// snapshot, then a tick batch. No server required.
fn run_demo() {
    tracing::info!("Sandbox client -- offline reconciliation demo");

    let mut store = BlockStore::new();

    let snapshot = vec![
        (BlockPos::new(0, 0, 0), BlockType::new(tags::RANDOM), OwnerKey::new(vec![0xAA])),
        (BlockPos::new(1, 0, 0), BlockType::new(tags::GREEN), OwnerKey::new(vec![0xAA])),
        (BlockPos::new(0, 1, 0), BlockType::new(tags::GRAY), OwnerKey::new(vec![0xBB])),
    ];
    for change in store.replace_all(snapshot) {
        tracing::info!("bootstrap: {:?}", change);
    }
    tracing::info!("Store holds {} blocks", store.len());

    // One overwrite, one removal, as a tick poll would deliver them.
    let ticks = vec![
        (BlockPos::new(1, 0, 0), BlockType::new(tags::GRAY), OwnerKey::new(vec![0xCC])),
        (BlockPos::new(0, 0, 0), BlockType::air(), OwnerKey::default()),
    ];
    for (pos, kind, owner) in ticks {
        if let Some(change) = store.apply(pos, kind, owner) {
            tracing::info!("tick: {:?}", change);
        }
    }
    tracing::info!("Store holds {} blocks after tick", store.len());
}
