//! Testing utilities for the storefront workspace
//!
//! Shared fakes, fixtures, and assertions.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront_occ::cms::{OccCmsPageAdapter, OccCmsPageNormalizer};
use storefront_occ::{
    ConverterService, FeatureConfigService, FeaturesConfig, HttpTransport, OccConfig, OccEndpoints,
    OccError, UserIdResolver, USER_CMS_ENDPOINTS,
};
use storefront_state::{AnonymousConsent, AnonymousConsentsFacade};
use url::Url;

pub const TEST_BASE_URL: &str = "https://api.example.com";
pub const TEST_OCC_ROOT: &str = "https://api.example.com/occ/v2/electronics-spa";

type Responder = dyn Fn(&Url) -> Result<Value, OccError> + Send + Sync;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

/// Transport that records every request and answers from a closure
pub struct RecordingTransport {
    respond: Box<Responder>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn with(respond: impl Fn(&Url) -> Result<Value, OccError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(body: Value) -> Arc<Self> {
        Self::with(move |_| Ok(body.clone()))
    }

    pub fn status(status: u16) -> Arc<Self> {
        Self::with(move |url| {
            Err(OccError::Status {
                status,
                url: url.to_string(),
            })
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.url.to_string()).collect()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn get_json(&self, url: &Url, headers: &HeaderMap) -> Result<Value, OccError> {
        self.requests.lock().push(RecordedRequest {
            url: url.clone(),
            headers: headers.clone(),
        });
        (self.respond)(url)
    }
}

/// Resolver that always yields the same id
#[derive(Debug, Clone)]
pub struct StaticUserId(pub String);

#[async_trait]
impl UserIdResolver for StaticUserId {
    async fn user_id(&self) -> Result<String, OccError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentsCall {
    SetConsents(Vec<AnonymousConsent>),
    ToggleBannerDismissed(bool),
    ToggleTemplatesUpdated(bool),
}

/// Facade that only records calls
#[derive(Debug, Default)]
pub struct RecordingConsentsFacade {
    calls: Mutex<Vec<ConsentsCall>>,
}

impl RecordingConsentsFacade {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<ConsentsCall> {
        self.calls.lock().clone()
    }
}

impl AnonymousConsentsFacade for RecordingConsentsFacade {
    fn set_consents(&self, consents: Vec<AnonymousConsent>) {
        self.calls.lock().push(ConsentsCall::SetConsents(consents));
    }

    fn toggle_banner_dismissed(&self, dismissed: bool) {
        self.calls
            .lock()
            .push(ConsentsCall::ToggleBannerDismissed(dismissed));
    }

    fn toggle_templates_updated(&self, updated: bool) {
        self.calls
            .lock()
            .push(ConsentsCall::ToggleTemplatesUpdated(updated));
    }
}

pub fn test_endpoints() -> OccEndpoints {
    OccEndpoints::new(OccConfig::new().with_base_url(TEST_BASE_URL))
}

pub fn normalizing_converter() -> Arc<ConverterService> {
    let converter = Arc::new(ConverterService::new());
    OccCmsPageNormalizer::register(&converter);
    converter
}

/// Adapter over `http` with the default normalizer
pub fn setup_page_adapter(
    http: Arc<RecordingTransport>,
    user_endpoints: bool,
    user_id: &str,
) -> OccCmsPageAdapter {
    let features =
        FeatureConfigService::new(FeaturesConfig::new().with_flag(USER_CMS_ENDPOINTS, user_endpoints));
    OccCmsPageAdapter::new(
        http,
        test_endpoints(),
        normalizing_converter(),
        Arc::new(StaticUserId(user_id.to_string())),
        features,
    )
}

/// OCC response for a small content page
pub fn sample_occ_page() -> Value {
    json!({
        "uid": "faq",
        "name": "FAQ Page",
        "typeCode": "ContentPage",
        "title": "Frequently Asked Questions",
        "template": "ContentPage1Template",
        "label": "/faq",
        "robotTag": "INDEX_FOLLOW",
        "contentSlots": {
            "contentSlot": [
                {
                    "slotId": "SiteLogoSlot",
                    "position": "SiteLogo",
                    "components": {
                        "component": [{
                            "uid": "SiteLogoComponent",
                            "typeCode": "SimpleBannerComponent",
                            "name": "Site Logo",
                            "modifiedtime": "2024-03-12T09:41:00+0000",
                            "urlLink": "/",
                            "properties": { "smartedit": { "componentId": "SiteLogoComponent" } }
                        }]
                    }
                },
                {
                    "slotId": "Section2Slot-faq",
                    "position": "Section2A",
                    "components": {
                        "component": [
                            {
                                "uid": "FaqParagraph",
                                "typeCode": "CMSParagraphComponent",
                                "content": "<h2>FAQ</h2>"
                            },
                            {
                                "uid": "LoginFlex",
                                "typeCode": "CMSFlexComponent",
                                "flexType": "ReturningCustomerLoginComponent"
                            }
                        ]
                    }
                }
            ]
        }
    })
}

/// Stored consents snapshot with both sections set
pub fn sample_consents_snapshot() -> Value {
    json!({
        "templates": {
            "loading": false,
            "error": false,
            "success": true,
            "value": [{ "id": "MARKETING", "version": 1 }]
        },
        "consents": [{
            "templateCode": "MARKETING",
            "templateVersion": 1,
            "consentState": "GIVEN"
        }],
        "ui": { "bannerDismissed": true, "updated": false }
    })
}
