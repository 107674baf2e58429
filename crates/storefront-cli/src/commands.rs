//! Subcommand implementations

use crate::config::StorefrontConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use storefront_occ::cms::{CmsPageAdapter, OccCmsPageAdapter, OccCmsPageNormalizer, PageContext, PageType};
use storefront_occ::{
    ConverterService, FeatureConfigService, OccEndpoints, ReqwestTransport, UserIdService,
    USER_CMS_ENDPOINTS,
};
use storefront_state::{
    AnonymousConsentsFacade, AnonymousConsentsService, AnonymousConsentsState,
    AnonymousConsentsStatePersistence, FileStorage, MemoryStorage, StatePersistence,
    StorageSyncType, Store, ANONYMOUS_CONSENTS_STORAGE_KEY,
};

const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// Fetch and print a normalized page
pub(crate) async fn page(
    config: &StorefrontConfig,
    id: String,
    page_type: Option<PageType>,
    user: Option<String>,
) -> Result<()> {
    let converter = Arc::new(ConverterService::new());
    OccCmsPageNormalizer::register(&converter);

    let features = FeatureConfigService::new(config.features.clone());
    let user_id = match user {
        Some(user) => {
            features.set_flag(USER_CMS_ENDPOINTS, true);
            UserIdService::with_user_id(user)
        }
        None => UserIdService::new(),
    };

    let adapter = OccCmsPageAdapter::new(
        Arc::new(ReqwestTransport::new()),
        OccEndpoints::new(config.occ.clone()),
        converter,
        Arc::new(user_id),
        features,
    );

    let context = PageContext { id, page_type };
    let model = adapter
        .load(&context)
        .await
        .with_context(|| format!("failed to load page {context}"))?;
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

fn persistence(config: &StorefrontConfig) -> Result<StatePersistence> {
    let file = FileStorage::open(&config.storage.path)
        .with_context(|| format!("failed to open storage {}", config.storage.path.display()))?;
    Ok(
        StatePersistence::new(Arc::new(file), Arc::new(MemoryStorage::new()))
            .with_prefix(config.storage.prefix.clone()),
    )
}

fn stored_consents(persistence: &StatePersistence) -> Option<Value> {
    persistence.read(
        StorageSyncType::LocalStorage,
        &[],
        ANONYMOUS_CONSENTS_STORAGE_KEY,
    )
}

/// Print the persisted consents snapshot
pub(crate) fn show_consents(config: &StorefrontConfig) -> Result<()> {
    let persistence = persistence(config)?;
    match stored_consents(&persistence) {
        Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        None => println!("No stored anonymous consents"),
    }
    Ok(())
}

/// Restore the stored consents, dismiss the banner and persist the result
pub(crate) async fn dismiss_banner(config: &StorefrontConfig) -> Result<()> {
    let persistence = persistence(config)?;
    let store = Store::new(AnonymousConsentsState::default());
    let service = Arc::new(AnonymousConsentsService::new(store.clone()));
    let mut sync =
        AnonymousConsentsStatePersistence::new(persistence.clone(), store, service.clone());
    sync.init_sync();

    service.toggle_banner_dismissed(true);

    let written = tokio::time::timeout(WRITE_TIMEOUT, async {
        loop {
            let dismissed = stored_consents(&persistence)
                .is_some_and(|snapshot| snapshot["ui"]["bannerDismissed"] == Value::Bool(true));
            if dismissed {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    sync.dispose();

    written.context("timed out waiting for consents to be persisted")?;
    println!("Consent banner dismissed");
    Ok(())
}
