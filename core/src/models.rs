// Domain payloads for the rock/geo backend and the AI chat service
//
// Field renames follow the backend's column names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A lab value stored either as a number or as free text (e.g. "12%")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    Number(f64),
    Text(String),
}

impl Measurement {
    /// Numeric value, parsing text such as "12.5" or "12.5%"
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Measurement::Number(n) => Some(*n),
            Measurement::Text(t) => t.trim().trim_end_matches('%').trim().parse().ok(),
        }
    }
}

// ==================== Media ====================

/// Media kind derived from a file type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    pub fn from_type(file_type: &str) -> Self {
        match file_type.trim().to_lowercase().as_str() {
            "png" | "jpg" | "jpeg" => MediaKind::Image,
            "mp4" => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }
}

/// Media-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("media file has no inline data")]
    NoData,

    #[error("not a base64 data URL")]
    NotDataUrl,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Decoded inline media
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMedia {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Decode a `data:<mime>;base64,<payload>` URL
pub fn decode_data_url(data_url: &str) -> Result<DecodedMedia, MediaError> {
    let rest = data_url.strip_prefix("data:").ok_or(MediaError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(MediaError::NotDataUrl)?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or(MediaError::NotDataUrl)?;

    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| MediaError::InvalidBase64(e.to_string()))?;

    Ok(DecodedMedia {
        mime_type: mime_type.to_string(),
        bytes,
    })
}

// ==================== 3D models ====================

/// Row of the 3D model table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeDModel {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "地理地名", default)]
    pub place_name: Option<String>,

    #[serde(rename = "文字介绍", default)]
    pub description: Option<String>,

    #[serde(rename = "大地坐标X", default)]
    pub coord_x: Option<f64>,

    #[serde(rename = "大地坐标Y", default)]
    pub coord_y: Option<f64>,

    #[serde(rename = "盆地", default)]
    pub basin: Option<String>,

    #[serde(rename = "所处方位", default)]
    pub orientation: Option<String>,

    /// Model asset location
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
}

/// Media attached to a 3D model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMediaFile {
    pub id: i64,

    #[serde(rename = "type", default)]
    pub file_type: String,

    #[serde(rename = "fileName", default)]
    pub file_name: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    /// Inline image as a data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ModelMediaFile {
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_type(&self.file_type)
    }

    pub fn is_image(&self) -> bool {
        self.kind() == MediaKind::Image
    }

    pub fn is_video(&self) -> bool {
        self.kind() == MediaKind::Video
    }

    /// Lowercase the type tag in place
    pub fn normalize(&mut self) {
        self.file_type = self.file_type.trim().to_lowercase();
    }

    pub fn decode_data(&self) -> Result<DecodedMedia, MediaError> {
        decode_data_url(self.data.as_deref().ok_or(MediaError::NoData)?)
    }
}

/// 3D model with its media files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeDModelDetail {
    #[serde(flatten)]
    pub model: ThreeDModel,

    #[serde(default)]
    pub media_files: Vec<ModelMediaFile>,

    #[serde(default)]
    pub has_media: bool,
}

impl ThreeDModelDetail {
    pub fn normalize_media(&mut self) {
        for media in &mut self.media_files {
            media.normalize();
        }
        self.has_media = !self.media_files.is_empty();
    }

    pub fn images(&self) -> impl Iterator<Item = &ModelMediaFile> {
        self.media_files.iter().filter(|m| m.is_image())
    }

    pub fn videos(&self) -> impl Iterator<Item = &ModelMediaFile> {
        self.media_files.iter().filter(|m| m.is_video())
    }
}

// ==================== Rock samples ====================

/// Relation between two rock samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "关联类型", default)]
    pub relation_type: Option<String>,

    #[serde(rename = "关联实体ID1")]
    pub entity_id1: String,

    #[serde(rename = "关联实体ID2")]
    pub entity_id2: String,

    /// Relation strength; rows are ordered by it, highest first
    #[serde(rename = "关联程度", default)]
    pub degree: Option<f64>,

    #[serde(rename = "文件", default)]
    pub file: Option<String>,

    #[serde(rename = "实体1名称", default)]
    pub entity1_name: Option<String>,

    #[serde(rename = "实体2名称", default)]
    pub entity2_name: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

impl Relation {
    /// The entity on the other side of `entity_id`
    pub fn counterpart(&self, entity_id: &str) -> Option<&str> {
        if self.entity_id1 == entity_id {
            Some(self.entity_id2.as_str())
        } else if self.entity_id2 == entity_id {
            Some(self.entity_id1.as_str())
        } else {
            None
        }
    }
}

/// Inline image attached to a sample or thin-section report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMediaFile {
    pub id: i64,

    pub data: String,

    #[serde(rename = "type", default)]
    pub file_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl SampleMediaFile {
    pub fn decode_data(&self) -> Result<DecodedMedia, MediaError> {
        decode_data_url(&self.data)
    }
}

/// Basic information for one rock sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RockSampleDetail {
    #[serde(rename = "编号")]
    pub number: String,

    #[serde(rename = "名称", default)]
    pub name: Option<String>,

    #[serde(rename = "盆地", default)]
    pub basin: Option<String>,

    #[serde(rename = "来源", default)]
    pub source: Option<String>,

    #[serde(rename = "层位", default)]
    pub horizon: Option<String>,

    #[serde(rename = "岩性", default)]
    pub lithology: Option<String>,

    #[serde(rename = "描述", default)]
    pub description: Option<String>,

    #[serde(rename = "采样位置", default)]
    pub sampling_location: Option<String>,

    #[serde(rename = "采样时间", default)]
    pub sampling_time: Option<String>,

    #[serde(default)]
    pub media_files: Vec<SampleMediaFile>,
}

/// Thin-section identification report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinSectionReport {
    #[serde(rename = "编号")]
    pub number: String,

    #[serde(rename = "岩类", default)]
    pub rock_class: Option<String>,

    #[serde(rename = "成分", default)]
    pub composition: Option<String>,

    #[serde(rename = "粒度", default)]
    pub grain_size: Option<String>,

    #[serde(rename = "特殊物质", default)]
    pub special_substance: Option<String>,

    #[serde(rename = "特殊结构", default)]
    pub special_structure: Option<String>,

    #[serde(rename = "颜色", default)]
    pub color: Option<String>,

    #[serde(rename = "照片", default)]
    pub photo: Option<String>,

    #[serde(rename = "磨圆", default)]
    pub rounding: Option<String>,

    #[serde(rename = "面孔率", default)]
    pub face_porosity: Option<Measurement>,

    #[serde(rename = "分选", default)]
    pub sorting: Option<String>,

    #[serde(rename = "杂基", default)]
    pub matrix: Option<Measurement>,

    #[serde(rename = "岩屑含量", default)]
    pub lithic_content: Option<Measurement>,

    #[serde(rename = "长石含量", default)]
    pub feldspar_content: Option<Measurement>,

    #[serde(rename = "石英含量", default)]
    pub quartz_content: Option<Measurement>,

    #[serde(default)]
    pub media_files: Vec<SampleMediaFile>,
}

/// XRF element analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XrfTestResult {
    #[serde(rename = "层位", default)]
    pub horizon: Option<String>,

    #[serde(rename = "野外定名", default)]
    pub field_name: Option<String>,

    #[serde(rename = "Si", default)]
    pub si: Option<Measurement>,

    #[serde(rename = "Mg", default)]
    pub mg: Option<Measurement>,

    #[serde(rename = "Al", default)]
    pub al: Option<Measurement>,

    #[serde(rename = "K", default)]
    pub k: Option<Measurement>,

    #[serde(rename = "Ca", default)]
    pub ca: Option<Measurement>,

    #[serde(rename = "Fe", default)]
    pub fe: Option<Measurement>,

    #[serde(rename = "Ba", default)]
    pub ba: Option<Measurement>,
}

impl XrfTestResult {
    /// Element symbol and value pairs that are present
    pub fn elements(&self) -> Vec<(&'static str, &Measurement)> {
        [
            ("Si", &self.si),
            ("Mg", &self.mg),
            ("Al", &self.al),
            ("K", &self.k),
            ("Ca", &self.ca),
            ("Fe", &self.fe),
            ("Ba", &self.ba),
        ]
        .into_iter()
        .filter_map(|(symbol, value)| value.as_ref().map(|v| (symbol, v)))
        .collect()
    }
}

// ==================== Rock specimen search ====================

/// Query for the rock specimen search. Unset fields are left out of the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RockSampleFilters {
    /// Substring match
    #[serde(rename = "基本名称", skip_serializing_if = "Option::is_none")]
    pub basic_name: Option<String>,

    #[serde(rename = "岩石类别", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(rename = "颜色", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Substring match
    #[serde(rename = "主要成分", skip_serializing_if = "Option::is_none")]
    pub main_component: Option<String>,

    #[serde(rename = "粒度", skip_serializing_if = "Option::is_none")]
    pub grain_size: Option<String>,

    #[serde(rename = "特殊结构", skip_serializing_if = "Option::is_none")]
    pub special_structure: Option<String>,

    #[serde(rename = "特殊矿物", skip_serializing_if = "Option::is_none")]
    pub special_mineral: Option<String>,

    #[serde(rename = "系", skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(rename = "组段", skip_serializing_if = "Option::is_none")]
    pub formation: Option<String>,
}

impl RockSampleFilters {
    /// Treat blank strings as unset, matching how the backend ignores them
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.basic_name,
            &mut self.category,
            &mut self.color,
            &mut self.main_component,
            &mut self.grain_size,
            &mut self.special_structure,
            &mut self.special_mineral,
            &mut self.system,
            &mut self.formation,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One row of the specimen search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RockSpecimen {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "系", default)]
    pub system: Option<String>,

    #[serde(rename = "组段", default)]
    pub formation: Option<String>,

    #[serde(rename = "基本名称", default)]
    pub basic_name: Option<String>,

    #[serde(rename = "颜色", default)]
    pub color: Option<String>,

    #[serde(rename = "主要成分", default)]
    pub main_component: Option<String>,

    #[serde(rename = "粒度", default)]
    pub grain_size: Option<String>,

    #[serde(rename = "特殊结构", default)]
    pub special_structure: Option<String>,

    #[serde(rename = "特殊矿物", default)]
    pub special_mineral: Option<String>,

    #[serde(rename = "岩石类别", default)]
    pub category: Option<String>,

    /// First attached image as a data URL
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

/// Distinct values available for each filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(rename = "岩石类别", default)]
    pub categories: Vec<String>,

    #[serde(rename = "颜色", default)]
    pub colors: Vec<String>,

    #[serde(rename = "粒度", default)]
    pub grain_sizes: Vec<String>,

    #[serde(rename = "特殊结构", default)]
    pub special_structures: Vec<String>,

    #[serde(rename = "特殊矿物", default)]
    pub special_minerals: Vec<String>,
}

// ==================== GeoJSON ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub id: Option<Value>,

    pub geometry: Option<Value>,

    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }
}

// ==================== AI chat ====================

/// POST /chat-messages body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    pub inputs: Map<String, Value>,
    pub query: String,
    pub response_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    pub user: String,
}

impl ChatMessageRequest {
    pub const BLOCKING: &'static str = "blocking";

    /// Blocking request; an absent conversation id is sent as ""
    pub fn blocking(
        query: impl Into<String>,
        conversation_id: Option<&str>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            inputs: Map::new(),
            query: query.into(),
            response_mode: Self::BLOCKING.to_string(),
            conversation_id: Some(conversation_id.unwrap_or_default().to_string()),
            user: user.into(),
        }
    }

    /// Blocking request that starts no conversation; `conversation_id` is left out
    pub fn standalone(query: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            conversation_id: None,
            ..Self::blocking(query, None, user)
        }
    }
}

/// Blocking-mode chat answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    #[serde(default)]
    pub event: Option<String>,

    #[serde(default)]
    pub message_id: Option<String>,

    #[serde(default)]
    pub conversation_id: Option<String>,

    #[serde(default)]
    pub mode: Option<String>,

    #[serde(default)]
    pub answer: String,

    #[serde(default)]
    pub metadata: Option<Value>,

    #[serde(default)]
    pub created_at: Option<i64>,
}

/// POST /files/upload result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUploadResponse {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default)]
    pub extension: Option<String>,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub created_by: Option<String>,

    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Outcome of an AI connectivity probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionStatus {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
