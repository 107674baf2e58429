//! OCC page normalizer

use super::model::{
    CmsComponent, CmsStructureModel, ContentSlotComponentData, ContentSlotData, OccCmsComponent,
    OccCmsPage, Page,
};
use crate::converter::{Converter, ConverterKey, ConverterService};
use crate::error::ConversionError;

/// Pipeline turning a raw OCC page into a [`CmsStructureModel`]
pub const CMS_PAGE_NORMALIZER: ConverterKey<OccCmsPage, CmsStructureModel> =
    ConverterKey::new("CmsPageNormalizer");

const FLEX_COMPONENT: &str = "CMSFlexComponent";
const JSP_INCLUDE_COMPONENT: &str = "JspIncludeComponent";

/// Default stage of [`CMS_PAGE_NORMALIZER`]
///
/// Fills the page data, the slots keyed by position and the flat component
/// list. Later stages receive its output as their target.
#[derive(Debug, Clone, Copy, Default)]
pub struct OccCmsPageNormalizer;

impl OccCmsPageNormalizer {
    /// Register this stage on `converter`
    pub fn register(converter: &ConverterService) {
        converter.register(CMS_PAGE_NORMALIZER, Self);
    }
}

impl Converter<OccCmsPage, CmsStructureModel> for OccCmsPageNormalizer {
    fn convert(
        &self,
        source: &OccCmsPage,
        target: Option<CmsStructureModel>,
    ) -> Result<CmsStructureModel, ConversionError> {
        let mut target = target.unwrap_or_default();
        normalize_page_data(source, &mut target);
        normalize_page_slots(source, &mut target);
        normalize_components(source, &mut target);
        Ok(target)
    }
}

fn normalize_page_data(source: &OccCmsPage, target: &mut CmsStructureModel) {
    let page = target.page.get_or_insert_with(Page::default);
    page.load_time = chrono::Utc::now().timestamp_millis();
    page.uid.clone_from(&source.uid);
    page.name.clone_from(&source.name);
    page.page_type.clone_from(&source.type_code);
    page.title.clone_from(&source.title);
    page.template.clone_from(&source.template);
    page.description.clone_from(&source.description);
    page.label.clone_from(&source.label);
    page.properties.clone_from(&source.properties);
    page.robots = source
        .robot_tag
        .map(|robots| robots.meta().to_vec())
        .unwrap_or_default();
}

fn normalize_page_slots(source: &OccCmsPage, target: &mut CmsStructureModel) {
    let page = target.page.get_or_insert_with(Page::default);
    for slot in source.slots() {
        let Some(position) = slot.position.as_ref() else {
            tracing::debug!(slot = ?slot.slot_id, "Skipping slot without position");
            continue;
        };
        let data = ContentSlotData {
            uid: slot.slot_id.clone(),
            components: slot.components().map(slot_component).collect(),
            properties: slot.properties.clone(),
        };
        page.slots.insert(position.clone(), data);
    }
}

fn slot_component(component: &OccCmsComponent) -> ContentSlotComponentData {
    ContentSlotComponentData {
        uid: component.uid.clone(),
        type_code: component.type_code.clone(),
        flex_type: flex_type(component),
        properties: component.properties.clone(),
    }
}

fn flex_type(component: &OccCmsComponent) -> Option<String> {
    match component.type_code.as_deref() {
        Some(FLEX_COMPONENT) => component.flex_type.clone(),
        Some(JSP_INCLUDE_COMPONENT) => component.uid.clone(),
        _ => component.type_code.clone(),
    }
}

fn normalize_components(source: &OccCmsPage, target: &mut CmsStructureModel) {
    let components = source
        .slots()
        .flat_map(|slot| slot.components())
        .map(|component| CmsComponent {
            uid: component.uid.clone(),
            type_code: component.type_code.clone(),
            flex_type: component.flex_type.clone(),
            name: component.name.clone(),
            modified_time: component.modifiedtime.clone(),
            extra: component.extra.clone(),
        });
    target.components.extend(components);
}
