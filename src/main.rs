use cms_widgets::app::AppContext;
use cms_widgets::config::AppConfig;
use cms_widgets::logging;
use cms_widgets::storage::{FileStore, PreferenceStore};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // environment first: the bundled fallback writes env vars and must run single-threaded
    let config = AppConfig::from_env()?;
    logging::init();
    tracing::info!(base_url = %config.base_url, "starting CMS widgets");

    let store: Arc<dyn PreferenceStore> = Arc::new(FileStore::in_data_dir());
    let context = AppContext::new(config, store)?;

    dioxus::LaunchBuilder::new()
        .with_context(context)
        .launch(cms_widgets::ui::App);
    Ok(())
}
