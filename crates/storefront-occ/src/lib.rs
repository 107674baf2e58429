//! Storefront OCC - adapters for the OCC commerce REST API
//!
//! Provides:
//! - [`OccConfig`] and [`OccEndpoints`]: named endpoint templates resolved to URLs
//! - [`FeatureConfigService`]: runtime feature flags
//! - [`UserIdService`]: the user id OCC requests are scoped to
//! - [`ConverterService`]: keyed, multi-stage converter pipelines
//! - [`cms`]: CMS page loading and normalization
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_occ::prelude::*;
//!
//! # async fn example() -> Result<(), OccError> {
//! let converter = Arc::new(ConverterService::new());
//! OccCmsPageNormalizer::register(&converter);
//!
//! let adapter = OccCmsPageAdapter::new(
//!     Arc::new(ReqwestTransport::new()),
//!     OccEndpoints::new(OccConfig::default()),
//!     converter,
//!     Arc::new(UserIdService::new()),
//!     FeatureConfigService::default(),
//! );
//! let page = adapter.load(&PageContext::home()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cms;
pub mod config;
pub mod converter;
pub mod endpoints;
pub mod error;
pub mod features;
pub mod http;
pub mod user_id;

pub use config::{FeatureToggle, FeaturesConfig, OccConfig, DEFAULT_ENDPOINTS};
pub use converter::{Converter, ConverterKey, ConverterService};
pub use endpoints::{BuildUrlOptions, OccEndpoints};
pub use error::{ConversionError, EndpointError, OccError};
pub use features::{FeatureConfigService, USER_CMS_ENDPOINTS};
pub use http::{json_headers, HttpTransport, ReqwestTransport};
pub use user_id::{UserIdResolver, UserIdService, OCC_USER_ID_ANONYMOUS, OCC_USER_ID_CURRENT};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for loading CMS pages
    pub use crate::cms::{
        CmsPageAdapter, CmsStructureModel, OccCmsPageAdapter, OccCmsPageNormalizer, PageContext,
        PageType,
    };
    pub use crate::{
        ConverterService, FeatureConfigService, OccConfig, OccEndpoints, OccError,
        ReqwestTransport, UserIdService,
    };
    pub use std::sync::Arc;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
