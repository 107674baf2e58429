//! CMS pages over OCC

pub mod model;
pub mod normalizer;
pub mod page_adapter;
pub mod page_context;

pub use model::{
    CmsComponent, CmsStructureModel, ContentSlotComponentData, ContentSlotData, OccCmsComponent,
    OccCmsPage, Page, PageRobots, PageRobotsMeta,
};
pub use normalizer::{OccCmsPageNormalizer, CMS_PAGE_NORMALIZER};
pub use page_adapter::{
    build_page_endpoint, page_request_params, CmsPageAdapter, CmsPageRequest, OccCmsPageAdapter,
};
pub use page_context::{PageContext, PageType, UnknownPageType, HOME_PAGE_CONTEXT, SMART_EDIT_CONTEXT};
