use pretty_assertions::assert_eq;
use proptest::prelude::*;
use storefront_occ::cms::{
    page_request_params, PageContext, PageType, HOME_PAGE_CONTEXT,
    SMART_EDIT_CONTEXT,
};

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn any_page_type() -> impl Strategy<Value = Option<PageType>> {
    prop_oneof![
        Just(None),
        Just(Some(PageType::ContentPage)),
        Just(Some(PageType::ProductPage)),
        Just(Some(PageType::CategoryPage)),
        Just(Some(PageType::CatalogPage)),
    ]
}

#[test]
fn test_content_page_params() {
    let params = page_request_params(&PageContext::new("/my-page", PageType::ContentPage));
    assert_eq!(
        params.query_params(),
        pairs(&[("pageType", "ContentPage"), ("pageLabelOrId", "/my-page")])
    );
}

#[test]
fn test_product_page_params() {
    let params = page_request_params(&PageContext::new("1234", PageType::ProductPage));
    assert_eq!(
        params.query_params(),
        pairs(&[("pageType", "ProductPage"), ("code", "1234")])
    );
}

#[test]
fn test_untyped_params() {
    let params = page_request_params(&PageContext::untyped("1234"));
    assert_eq!(params.query_params(), pairs(&[("code", "1234")]));
}

proptest! {
    #[test]
    fn prop_sentinels_yield_no_params(
        id in prop_oneof![Just(HOME_PAGE_CONTEXT), Just(SMART_EDIT_CONTEXT)],
        page_type in any_page_type(),
    ) {
        let context = PageContext { id: id.to_string(), page_type };
        prop_assert!(page_request_params(&context).is_empty());
    }

    #[test]
    fn prop_type_is_forwarded_and_id_routed(
        id in "[a-zA-Z0-9/_-]{1,24}",
        page_type in any_page_type(),
    ) {
        prop_assume!(id != HOME_PAGE_CONTEXT && id != SMART_EDIT_CONTEXT);
        let params = page_request_params(&PageContext { id: id.clone(), page_type });

        prop_assert_eq!(params.page_type, page_type);
        prop_assert!(params.fields.is_none());
        if page_type == Some(PageType::ContentPage) {
            prop_assert_eq!(params.page_label_or_id, Some(id));
            prop_assert!(params.code.is_none());
        } else {
            prop_assert_eq!(params.code, Some(id));
            prop_assert!(params.page_label_or_id.is_none());
        }
    }
}
