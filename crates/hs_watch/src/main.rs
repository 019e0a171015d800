//! hs_watch -- headless shader watcher.
//!
//! Loads a shader manifest, builds every listed program against the naga
//! checking backend, then polls the sources and re-checks whatever changed,
//! logging each commit or rollback. With `--once` it only does the initial
//! build and exits non-zero on the first broken program (useful in CI).

mod naga_backend;

use std::path::PathBuf;
use std::time::Duration;

use hs_core::{load_manifest_from_path, HotReloadController, ReloadSummary};
use naga_backend::NagaBackend;

#[derive(Debug, PartialEq, Eq)]
struct Options {
    manifest_path: PathBuf,
    once: bool,
    interval_override: Option<Duration>,
}

fn usage() -> String {
    "Usage: cargo run -p hs_watch -- <manifest.json> [--once] [--interval-ms <ms>]\nExample: cargo run -p hs_watch -- assets/shaders/shaders.json --interval-ms 100".to_string()
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut manifest_path = None;
    let mut once = false;
    let mut interval_override = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--once" => once = true,
            "--interval-ms" => {
                let raw = iter
                    .next()
                    .ok_or_else(|| format!("--interval-ms needs a value\n{}", usage()))?;
                let ms: u64 = raw
                    .parse()
                    .map_err(|e| format!("Invalid --interval-ms '{raw}': {e}"))?;
                if ms == 0 {
                    return Err("--interval-ms must be positive".to_string());
                }
                interval_override = Some(Duration::from_millis(ms));
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option '{flag}'\n{}", usage()));
            }
            path if manifest_path.is_none() => manifest_path = Some(PathBuf::from(path)),
            extra => return Err(format!("Unexpected argument '{extra}'\n{}", usage())),
        }
    }

    Ok(Options {
        manifest_path: manifest_path.ok_or_else(usage)?,
        once,
        interval_override,
    })
}

fn report(summary: &ReloadSummary) {
    if summary.is_noop() {
        return;
    }
    let committed: Vec<&str> = summary.committed().collect();
    let failed = summary.rolled_back().count();
    log::info!(
        "{} file(s) changed: {} program(s) reloaded, {} kept on previous build",
        summary.changed_files.len(),
        committed.len(),
        failed
    );
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args)?;

    let manifest = load_manifest_from_path(&options.manifest_path)?;
    let mut controller = HotReloadController::new(NagaBackend::new());
    manifest
        .register_all(&mut controller)
        .map_err(|e| e.to_string())?;
    log::info!(
        "{} program(s) built from {}",
        controller.backend().live_programs(),
        options.manifest_path.display()
    );

    if options.once {
        return Ok(());
    }

    let interval = options
        .interval_override
        .unwrap_or_else(|| manifest.poll_interval());
    log::info!(
        "Watching {} shader file(s) every {}ms",
        controller.tracker().len(),
        interval.as_millis()
    );
    loop {
        let summary = controller.poll_and_reload();
        report(&summary);
        std::thread::sleep(interval);
    }
}
