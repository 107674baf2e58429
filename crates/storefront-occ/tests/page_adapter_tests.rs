use pretty_assertions::assert_eq;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use storefront_occ::cms::{
    CmsPageAdapter, CmsStructureModel, OccCmsPage, OccCmsPageAdapter, PageContext, PageRobotsMeta,
    PageType, CMS_PAGE_NORMALIZER,
};
use storefront_occ::{
    ConversionError, FeatureConfigService, FeaturesConfig, OccError, UserIdService,
    USER_CMS_ENDPOINTS,
};
use storefront_test_utils::{
    normalizing_converter, sample_occ_page, setup_page_adapter, test_endpoints,
    RecordingTransport, StaticUserId, TEST_OCC_ROOT,
};

#[tokio::test]
async fn test_flag_off_untyped_uses_page_by_id() {
    let http = RecordingTransport::ok(sample_occ_page());
    let adapter = setup_page_adapter(http.clone(), false, "current");

    adapter.load(&PageContext::untyped("faq")).await.unwrap();

    assert_eq!(http.urls(), vec![format!("{TEST_OCC_ROOT}/cms/pages/faq")]);
}

#[tokio::test]
async fn test_flag_on_untyped_uses_user_page_by_id() {
    let http = RecordingTransport::ok(sample_occ_page());
    let adapter = setup_page_adapter(http.clone(), true, "current");

    adapter.load(&PageContext::untyped("faq")).await.unwrap();

    assert_eq!(
        http.urls(),
        vec![format!("{TEST_OCC_ROOT}/users/current/cms/pages/faq")]
    );
}

#[tokio::test]
async fn test_flag_on_waits_for_user_id_before_request() {
    let http = RecordingTransport::ok(sample_occ_page());
    let user_id = UserIdService::pending();
    let adapter = Arc::new(OccCmsPageAdapter::new(
        http.clone(),
        test_endpoints(),
        normalizing_converter(),
        Arc::new(user_id.clone()),
        FeatureConfigService::new(FeaturesConfig::new().with_flag(USER_CMS_ENDPOINTS, true)),
    ));

    let load = tokio::spawn({
        let adapter = adapter.clone();
        async move { adapter.load(&PageContext::untyped("faq")).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(http.urls().is_empty());
    assert!(!load.is_finished());

    user_id.set_user_id("current");
    let model = tokio::time::timeout(Duration::from_secs(1), load)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert_eq!(model.page.unwrap().uid.as_deref(), Some("faq"));
    assert_eq!(
        http.urls(),
        vec![format!("{TEST_OCC_ROOT}/users/current/cms/pages/faq")]
    );
}

#[tokio::test]
async fn test_unknown_robot_tag_loads_with_no_robots() {
    let http = RecordingTransport::ok(json!({ "uid": "faq", "robotTag": "NOARCHIVE" }));
    let adapter = setup_page_adapter(http, false, "current");

    let model = adapter.load(&PageContext::untyped("faq")).await.unwrap();

    let page = model.page.unwrap();
    assert_eq!(page.uid.as_deref(), Some("faq"));
    assert!(page.robots.is_empty());
}

#[tokio::test]
async fn test_flag_on_typed_uses_user_pages_with_params() {
    let http = RecordingTransport::ok(sample_occ_page());
    let adapter = setup_page_adapter(http.clone(), true, "anonymous");

    adapter
        .load(&PageContext::new("/my-page", PageType::ContentPage))
        .await
        .unwrap();

    assert_eq!(
        http.urls(),
        vec![format!(
            "{TEST_OCC_ROOT}/users/anonymous/cms/pages?pageType=ContentPage&pageLabelOrId=%2Fmy-page"
        )]
    );
}

#[tokio::test]
async fn test_home_page_sends_no_params() {
    let http = RecordingTransport::ok(sample_occ_page());
    let adapter = setup_page_adapter(http.clone(), false, "current");

    adapter.load(&PageContext::home()).await.unwrap();

    assert_eq!(http.urls(), vec![format!("{TEST_OCC_ROOT}/cms/pages")]);
}

#[tokio::test]
async fn test_request_is_json() {
    let http = RecordingTransport::ok(sample_occ_page());
    let adapter = setup_page_adapter(http.clone(), false, "current");

    adapter
        .load(&PageContext::new("1234", PageType::CategoryPage))
        .await
        .unwrap();

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].headers.get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_status_error_is_returned_unchanged() {
    let http = RecordingTransport::status(404);
    let adapter = setup_page_adapter(http.clone(), false, "current");

    let err = adapter.load(&PageContext::untyped("missing")).await.unwrap_err();

    assert!(matches!(err, OccError::Status { status: 404, .. }));
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn test_response_is_normalized() {
    let http = RecordingTransport::ok(sample_occ_page());
    let adapter = setup_page_adapter(http, false, "current");

    let model = adapter
        .load(&PageContext::new("/faq", PageType::ContentPage))
        .await
        .unwrap();

    let page = model.page.unwrap();
    assert_eq!(page.uid.as_deref(), Some("faq"));
    assert_eq!(page.label.as_deref(), Some("/faq"));
    assert_eq!(page.robots, vec![PageRobotsMeta::Index, PageRobotsMeta::Follow]);
    assert_eq!(
        page.slots.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["Section2A", "SiteLogo"]
    );

    let section = &page.slots["Section2A"];
    assert_eq!(
        section.components[1].flex_type.as_deref(),
        Some("ReturningCustomerLoginComponent")
    );

    assert_eq!(model.components.len(), 3);
    let logo = serde_json::to_value(&model.components[0]).unwrap();
    assert_eq!(logo["modifiedTime"], json!("2024-03-12T09:41:00+0000"));
    assert!(logo.get("properties").is_none());
}

#[tokio::test]
async fn test_later_stages_refine_normalized_page() {
    let http = RecordingTransport::ok(sample_occ_page());
    let converter = normalizing_converter();
    converter.register(
        CMS_PAGE_NORMALIZER,
        |source: &OccCmsPage, target: Option<CmsStructureModel>| -> Result<CmsStructureModel, ConversionError> {
            let mut model = target.ok_or_else(|| ConversionError::failed("TitleSuffix", "no page"))?;
            if let Some(page) = model.page.as_mut() {
                page.title = source.title.as_ref().map(|t| format!("{t} | Store"));
            }
            Ok(model)
        },
    );
    let adapter = OccCmsPageAdapter::new(
        http,
        test_endpoints(),
        converter,
        Arc::new(StaticUserId("current".to_string())),
        FeatureConfigService::new(FeaturesConfig::new().with_flag(USER_CMS_ENDPOINTS, false)),
    );

    let model = adapter.load(&PageContext::untyped("faq")).await.unwrap();

    assert_eq!(
        model.page.unwrap().title.as_deref(),
        Some("Frequently Asked Questions | Store")
    );
}

#[tokio::test]
async fn test_conversion_failure_is_returned() {
    let http = RecordingTransport::ok(sample_occ_page());
    let converter = normalizing_converter();
    converter.register(
        CMS_PAGE_NORMALIZER,
        |_: &OccCmsPage, _: Option<CmsStructureModel>| -> Result<CmsStructureModel, ConversionError> {
            Err(ConversionError::failed("Reject", "rejected"))
        },
    );
    let adapter = OccCmsPageAdapter::new(
        http,
        test_endpoints(),
        converter,
        Arc::new(StaticUserId("current".to_string())),
        FeatureConfigService::default(),
    );

    let err = adapter.load(&PageContext::untyped("faq")).await.unwrap_err();
    assert!(matches!(
        err,
        OccError::Conversion(ConversionError::Failed { converter: "Reject", .. })
    ));
}
