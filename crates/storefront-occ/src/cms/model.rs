//! CMS page models
//!
//! `Occ*` types mirror the OCC `cms/pages` response. [`CmsStructureModel`]
//! is the normalized form the storefront consumes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Robots directive of an OCC page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageRobots {
    IndexFollow,
    IndexNofollow,
    NoindexFollow,
    NoindexNofollow,
    /// Any tag this client does not know; contributes no meta values
    #[serde(other)]
    Unknown,
}

/// Single robots meta value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PageRobotsMeta {
    Index,
    Noindex,
    Follow,
    Nofollow,
}

impl PageRobots {
    /// Split into index and follow meta values
    #[must_use]
    pub const fn meta(self) -> &'static [PageRobotsMeta] {
        match self {
            Self::IndexFollow => &[PageRobotsMeta::Index, PageRobotsMeta::Follow],
            Self::IndexNofollow => &[PageRobotsMeta::Index, PageRobotsMeta::Nofollow],
            Self::NoindexFollow => &[PageRobotsMeta::Noindex, PageRobotsMeta::Follow],
            Self::NoindexNofollow => &[PageRobotsMeta::Noindex, PageRobotsMeta::Nofollow],
            Self::Unknown => &[],
        }
    }
}

/// Raw OCC page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccCmsPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot_tag: Option<PageRobots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_slots: Option<OccContentSlotList>,
}

impl OccCmsPage {
    /// All slots, empty when the page has none
    pub fn slots(&self) -> impl Iterator<Item = &OccContentSlot> {
        self.content_slots
            .iter()
            .flat_map(|list| list.content_slot.iter())
    }
}

/// `contentSlots` wrapper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccContentSlotList {
    #[serde(default)]
    pub content_slot: Vec<OccContentSlot>,
}

/// Raw OCC content slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccContentSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<OccComponentList>,
}

impl OccContentSlot {
    /// All components, empty when the slot has none
    pub fn components(&self) -> impl Iterator<Item = &OccCmsComponent> {
        self.components
            .iter()
            .flat_map(|list| list.component.iter())
    }
}

/// `components` wrapper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccComponentList {
    #[serde(default)]
    pub component: Vec<OccCmsComponent>,
}

/// Raw OCC component; type-specific fields are kept in `extra`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccCmsComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// OCC spells this one in lower case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiedtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Normalized page structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CmsStructureModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    #[serde(default)]
    pub components: Vec<CmsComponent>,
}

/// Normalized page data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Milliseconds since the epoch when the page was normalized
    pub load_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(default)]
    pub robots: Vec<PageRobotsMeta>,
    /// Slots by position
    #[serde(default)]
    pub slots: BTreeMap<String, ContentSlotData>,
}

/// Normalized slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSlotData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub components: Vec<ContentSlotComponentData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

/// Component reference inside a slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSlotComponentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<String>,
    /// Key used to pick the component implementation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

/// Component data, without slot-level properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
