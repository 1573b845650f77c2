mod catalog;
mod config;
mod fetcher;
mod model;
mod normalizer;
mod offers;
mod parser;
mod widget;

use catalog::render::{EMPTY_HINT, EMPTY_TITLE};
use config::{load_config, AppConfig};
use fetcher::HttpFeedSource;
use futures::future::join_all;
use offers::{HttpScriptSource, OffersPanel, OffersScript, ScriptRegistry};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use widget::{FeedStatus, GardenWidget, TITLE};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    // A widget without a feed URL only shows the configuration error
    let csv_url = match config.widget.resolved_csv_url() {
        Ok(url) => url,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    let feed = match HttpFeedSource::new() {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to create feed client: {}", e);
            return;
        }
    };
    let script_source = match HttpScriptSource::new() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create script client: {}", e);
            return;
        }
    };
    let registry = Arc::new(ScriptRegistry::new(Arc::new(script_source)));
    let script = OffersScript::new(registry, config.widget.offers_script_url.clone());

    info!("{}", TITLE);
    let mut widget = GardenWidget::new(csv_url);
    info!("Source CSV : {}", widget.csv_url());

    loop {
        let loaded = matches!(widget.load(&feed).await, FeedStatus::Loaded { .. });

        widget.apply_initial_category(config.widget.initial_category.as_deref());

        show(&widget);

        if config.widget.open_offers && loaded {
            open_all_offers(&widget, &script).await;
        }

        match config.refresh_interval_seconds {
            Some(secs) => {
                info!("Waiting {}s before refreshing the feed...", secs);
                sleep(Duration::from_secs(secs)).await;
            }
            None => break,
        }
    }
}

/// Logs what the presentation layer would draw.
fn show(widget: &GardenWidget) {
    if let Some(message) = widget.error_message() {
        warn!("{}", message);
        info!("{}", widget.count_label());
        return;
    }

    let chips: Vec<String> = widget
        .chips()
        .into_iter()
        .map(|c| if c.selected { format!("[{}]", c.label) } else { c.label })
        .collect();
    info!("Categories: {}", chips.join(" | "));
    info!("{}", widget.count_label());

    let model = widget.render();
    if model.is_empty() {
        info!("{} {}", EMPTY_TITLE, EMPTY_HINT);
        return;
    }
    for card in &model.cards {
        info!("• {} {}", card.product, card.pills().join(" · "));
    }
}

/// Opens every visible card at once; they all wait on the same script load.
async fn open_all_offers(widget: &GardenWidget, script: &OffersScript) {
    let mut panels: Vec<OffersPanel> = widget.panels();
    let pending: Vec<_> = panels.iter_mut().map(|p| p.toggle(script)).collect();

    let outcomes = join_all(pending.into_iter().map(|p| async move {
        match p {
            Some(load) => Some(load.wait().await),
            None => None,
        }
    }))
    .await;

    for ((panel, outcome), card) in panels.iter_mut().zip(outcomes).zip(widget.render().cards) {
        if let Some(outcome) = outcome {
            panel.complete(outcome);
        }
        match panel.mounted() {
            Some(el) => info!("{}: {}", card.product, el.to_html()),
            None => info!("{}: {}", card.product, panel.status_text()),
        }
    }
}
