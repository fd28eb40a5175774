use anyhow::{bail, Context};
use sketchboard::draw::palette::{JsonFileStore, KeyValueStore, MemoryStore};
use sketchboard::draw::replay::{Replayer, Script};
use sketchboard::draw::Session;
use sketchboard::settings::Settings;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args_os().skip(1);
    let Some(script_path) = args.next().map(PathBuf::from) else {
        bail!("usage: sketchboard <script.json> [output_dir]");
    };
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let settings = Settings::load("settings.json")?;
    sketchboard::logging::init(settings.debug_logging, settings.log_file.clone());

    let script = Script::load(&script_path)?;
    let base_dir = script_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut memory = MemoryStore::default();
    let mut file_store = settings.palette_store.clone().map(JsonFileStore::new);
    let store: &mut dyn KeyValueStore = match file_store.as_mut() {
        Some(store) => store,
        None => &mut memory,
    };

    let mut session = Session::new(settings.session_config())
        .with_rasterizer(Box::new(settings.font_book()));
    Replayer::new(base_dir, store)
        .run(&mut session, &script)
        .with_context(|| format!("replay {}", script_path.display()))?;

    let artifact = session.export()?;
    let path = artifact.write_to_dir(&output_dir)?;
    println!("{}", path.display());
    Ok(())
}
