//! CMS page adapter
//!
//! Resolves a [`PageContext`] to an OCC request, fetches the page and runs
//! it through the [`CMS_PAGE_NORMALIZER`] pipeline.
//!
//! Request parameters:
//! - sentinel ids (home page, SmartEdit preview) send no parameters
//! - a known type is sent as `pageType`
//! - the id is sent as `pageLabelOrId` for content pages and as `code`
//!   for every other page, including untyped ones
//!
//! With the [`USER_CMS_ENDPOINTS`] flag on, the user-scoped endpoints are
//! used and the request waits for the current user id.

use super::model::{CmsStructureModel, OccCmsPage};
use super::normalizer::CMS_PAGE_NORMALIZER;
use super::page_context::{PageContext, PageType};
use crate::converter::ConverterService;
use crate::endpoints::{BuildUrlOptions, OccEndpoints};
use crate::error::{EndpointError, OccError};
use crate::features::{FeatureConfigService, USER_CMS_ENDPOINTS};
use crate::http::{json_headers, HttpTransport};
use crate::user_id::UserIdResolver;
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Single page by id
pub const PAGE_ENDPOINT: &str = "page";
/// Page lookup by query parameters
pub const PAGES_ENDPOINT: &str = "pages";
/// Single page by id, scoped to a user
pub const USER_PAGE_ENDPOINT: &str = "userPage";
/// Page lookup by query parameters, scoped to a user
pub const USER_PAGES_ENDPOINT: &str = "userPages";

/// Loads normalized CMS pages
#[async_trait]
pub trait CmsPageAdapter: Send + Sync {
    /// Load the page described by `context`
    ///
    /// # Errors
    /// Transport, decoding and conversion failures, unchanged.
    async fn load(&self, context: &PageContext) -> Result<CmsStructureModel, OccError>;
}

/// Query parameters of a page request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmsPageRequest {
    pub page_type: Option<PageType>,
    pub page_label_or_id: Option<String>,
    pub code: Option<String>,
    pub fields: Option<String>,
}

impl CmsPageRequest {
    /// Whether no parameter is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.page_type.is_none()
            && self.page_label_or_id.is_none()
            && self.code.is_none()
            && self.fields.is_none()
    }

    /// Set parameters as OCC query pairs
    #[must_use]
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(4);
        if let Some(page_type) = self.page_type {
            params.push(("pageType".to_string(), page_type.as_str().to_string()));
        }
        if let Some(label) = &self.page_label_or_id {
            params.push(("pageLabelOrId".to_string(), label.clone()));
        }
        if let Some(code) = &self.code {
            params.push(("code".to_string(), code.clone()));
        }
        if let Some(fields) = &self.fields {
            params.push(("fields".to_string(), fields.clone()));
        }
        params
    }
}

/// Query parameters for `context`
#[must_use]
pub fn page_request_params(context: &PageContext) -> CmsPageRequest {
    if context.is_sentinel() {
        return CmsPageRequest::default();
    }

    let mut params = CmsPageRequest {
        page_type: context.page_type,
        ..CmsPageRequest::default()
    };
    if context.page_type == Some(PageType::ContentPage) {
        params.page_label_or_id = Some(context.id.clone());
    } else {
        params.code = Some(context.id.clone());
    }
    params
}

/// URL of the page request
///
/// `user_id` selects the user-scoped endpoints. Untyped contexts address the
/// page by id in the path and carry no query parameters.
///
/// # Errors
/// `EndpointError` when the endpoint template cannot be resolved.
pub fn build_page_endpoint(
    endpoints: &OccEndpoints,
    context: &PageContext,
    params: &CmsPageRequest,
    user_id: Option<&str>,
) -> Result<Url, EndpointError> {
    let typed = context.page_type.is_some();
    let (endpoint, mut options) = match user_id {
        Some(user_id) => {
            let options = BuildUrlOptions::new().url_param("userId", user_id);
            if typed {
                (USER_PAGES_ENDPOINT, options)
            } else {
                (USER_PAGE_ENDPOINT, options.url_param("id", context.id.as_str()))
            }
        }
        None if typed => (PAGES_ENDPOINT, BuildUrlOptions::new()),
        None => (
            PAGE_ENDPOINT,
            BuildUrlOptions::new().url_param("id", context.id.as_str()),
        ),
    };
    if typed {
        options = options.query_params(params.query_params());
    }
    endpoints.build_url(endpoint, &options)
}

/// OCC-backed [`CmsPageAdapter`]
pub struct OccCmsPageAdapter {
    http: Arc<dyn HttpTransport>,
    endpoints: OccEndpoints,
    converter: Arc<ConverterService>,
    user_id: Arc<dyn UserIdResolver>,
    features: FeatureConfigService,
}

impl OccCmsPageAdapter {
    /// Create an adapter
    pub fn new(
        http: Arc<dyn HttpTransport>,
        endpoints: OccEndpoints,
        converter: Arc<ConverterService>,
        user_id: Arc<dyn UserIdResolver>,
        features: FeatureConfigService,
    ) -> Self {
        Self {
            http,
            endpoints,
            converter,
            user_id,
            features,
        }
    }

    async fn request_url(&self, context: &PageContext) -> Result<Url, OccError> {
        let params = page_request_params(context);
        let url = if self.features.is_enabled(USER_CMS_ENDPOINTS) {
            let user_id = self.user_id.user_id().await?;
            build_page_endpoint(&self.endpoints, context, &params, Some(&user_id))?
        } else {
            build_page_endpoint(&self.endpoints, context, &params, None)?
        };
        Ok(url)
    }
}

impl std::fmt::Debug for OccCmsPageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccCmsPageAdapter")
            .field("endpoints", &self.endpoints)
            .field("converter", &self.converter)
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CmsPageAdapter for OccCmsPageAdapter {
    #[tracing::instrument(skip_all, fields(page = %context))]
    async fn load(&self, context: &PageContext) -> Result<CmsStructureModel, OccError> {
        let url = self.request_url(context).await?;
        tracing::debug!(url = %url, "Loading CMS page");

        let body = self.http.get_json(&url, &json_headers()).await?;
        let page: OccCmsPage = serde_json::from_value(body)?;
        Ok(self.converter.convert(&page, CMS_PAGE_NORMALIZER)?)
    }
}
