// Endpoint catalog

use rockgeo_core::EndpointDescriptor;

pub const GET_ROCK_DETAIL: EndpointDescriptor = EndpointDescriptor::get("getRockDetail", "/geo/rocks/{id}");
pub const GET_GEOJSON_DATA: EndpointDescriptor = EndpointDescriptor::get("getGeoJsonData", "/geo/geojson");
pub const GET_RELATED_ROCK_INFO: EndpointDescriptor =
    EndpointDescriptor::get("getRelatedRockInfo", "/related-rock/{number}");
pub const GET_RELATIONS: EndpointDescriptor = EndpointDescriptor::get("getRelations", "/relations/{entityId}");
pub const GET_ROCK_SAMPLE_DETAILS: EndpointDescriptor =
    EndpointDescriptor::get("getRockSampleDetails", "/rock-sample/{sampleId}");
pub const GET_THIN_SECTION_DETAILS: EndpointDescriptor =
    EndpointDescriptor::get("getThinSectionDetails", "/thin-section/{sampleId}");
pub const GET_XRF_TEST_RESULTS: EndpointDescriptor =
    EndpointDescriptor::get("getXRFTestResults", "/xrf-test/{sampleId}");
pub const GET_3D_MODELS: EndpointDescriptor = EndpointDescriptor::get("get3DModels", "/3d-models");
pub const GET_3D_MODEL_BY_ID: EndpointDescriptor = EndpointDescriptor::get("get3DModelById", "/3d-models/{modelId}");
pub const GET_ROCK_SAMPLES: EndpointDescriptor = EndpointDescriptor::get("getRockSamples", "/rock-samples");
pub const GET_FILTER_OPTIONS: EndpointDescriptor =
    EndpointDescriptor::get("getFilterOptions", "/rock-samples/filters");

// AI sub-client, relative to the AI base URL
pub const SEND_CHAT_MESSAGE: EndpointDescriptor = EndpointDescriptor::post_json("sendChatMessage", "/chat-messages");
pub const UPLOAD_FILE: EndpointDescriptor = EndpointDescriptor::post_multipart("uploadFile", "/files/upload");

pub const ROCK_CATALOG: &[EndpointDescriptor] = &[
    GET_ROCK_DETAIL,
    GET_GEOJSON_DATA,
    GET_RELATED_ROCK_INFO,
    GET_RELATIONS,
    GET_ROCK_SAMPLE_DETAILS,
    GET_THIN_SECTION_DETAILS,
    GET_XRF_TEST_RESULTS,
    GET_3D_MODELS,
    GET_3D_MODEL_BY_ID,
    GET_ROCK_SAMPLES,
    GET_FILTER_OPTIONS,
];

pub const AI_CATALOG: &[EndpointDescriptor] = &[SEND_CHAT_MESSAGE, UPLOAD_FILE];

#[cfg(test)]
mod tests {
    use super::*;
    use rockgeo_core::{HttpMethod, PayloadShape};
    use std::collections::HashSet;

    #[test]
    fn test_catalog_templates_are_well_formed() {
        for descriptor in ROCK_CATALOG.iter().chain(AI_CATALOG) {
            assert!(descriptor.path_template.starts_with('/'), "{}", descriptor.name);
            assert!(descriptor.path_params().is_ok(), "{}", descriptor.name);
        }
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<&str> = ROCK_CATALOG.iter().chain(AI_CATALOG).map(|d| d.name).collect();
        assert_eq!(names.len(), ROCK_CATALOG.len() + AI_CATALOG.len());
    }

    #[test]
    fn test_rock_catalog_is_read_only() {
        assert!(ROCK_CATALOG.iter().all(|d| d.method == HttpMethod::Get));
        assert_eq!(UPLOAD_FILE.payload, PayloadShape::Multipart);
        assert_eq!(SEND_CHAT_MESSAGE.payload, PayloadShape::Json);
    }

    #[test]
    fn test_path_params() {
        assert_eq!(GET_RELATIONS.path_params().unwrap(), vec!["entityId"]);
        assert!(GET_FILTER_OPTIONS.path_params().unwrap().is_empty());
    }
}
