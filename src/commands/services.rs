//! Builds the launcher the commands drive from the loaded configuration.

use crate::launcher::Launcher;
use crate::preference::FileStore;
use crate::runtime::Runtime;

use super::config::Config;

pub type CliLauncher<R> = Launcher<R, FileStore<R>>;

/// Launcher backed by the file store at `config.store_path`.
pub fn build_launcher<R: Runtime + Clone + 'static>(runtime: R, config: Config) -> CliLauncher<R> {
    let store = FileStore::new(runtime.clone(), config.store_path);
    Launcher::new(config.launcher, runtime, store)
}
