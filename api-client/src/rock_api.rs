// Typed rock/geo API

use rockgeo_core::{
    CallArgs, FeatureCollection, FilterOptions, Relation, RockSampleDetail, RockSampleFilters, RockSpecimen,
    ThinSectionReport, ThreeDModel, ThreeDModelDetail, XrfTestResult,
};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::endpoints;
use crate::errors::ApiError;
use crate::http_client::ApiClient;

/// Rock/geo backend operations on top of an [`ApiClient`]
#[derive(Debug, Clone)]
pub struct RockApi {
    client: ApiClient,
}

impl RockApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(ApiClient::new(config)?))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Register interceptors before the API is shared
    pub fn client_mut(&mut self) -> &mut ApiClient {
        &mut self.client
    }

    /// GET /geo/rocks/{id}
    pub async fn get_rock_detail(&self, id: &str) -> Result<Value, ApiError> {
        self.client
            .call(&endpoints::GET_ROCK_DETAIL, CallArgs::new().with("id", id))
            .await
    }

    /// GET /geo/geojson
    pub async fn get_geojson_data(&self) -> Result<FeatureCollection, ApiError> {
        self.client.call_as(&endpoints::GET_GEOJSON_DATA, CallArgs::new()).await
    }

    /// GET /related-rock/{number}
    pub async fn get_related_rock_info(&self, number: &str) -> Result<Value, ApiError> {
        self.client
            .call(&endpoints::GET_RELATED_ROCK_INFO, CallArgs::new().with("number", number))
            .await
    }

    /// GET /relations/{entityId}, strongest relation first
    pub async fn get_relations(&self, entity_id: &str) -> Result<Vec<Relation>, ApiError> {
        self.client
            .call_as(&endpoints::GET_RELATIONS, CallArgs::new().with("entityId", entity_id))
            .await
    }

    /// GET /rock-sample/{sampleId}
    pub async fn get_rock_sample_details(&self, sample_id: &str) -> Result<RockSampleDetail, ApiError> {
        self.client
            .call_as(&endpoints::GET_ROCK_SAMPLE_DETAILS, CallArgs::new().with("sampleId", sample_id))
            .await
    }

    /// GET /thin-section/{sampleId}
    pub async fn get_thin_section_details(&self, sample_id: &str) -> Result<ThinSectionReport, ApiError> {
        self.client
            .call_as(&endpoints::GET_THIN_SECTION_DETAILS, CallArgs::new().with("sampleId", sample_id))
            .await
    }

    /// GET /xrf-test/{sampleId}
    pub async fn get_xrf_test_results(&self, sample_id: &str) -> Result<XrfTestResult, ApiError> {
        self.client
            .call_as(&endpoints::GET_XRF_TEST_RESULTS, CallArgs::new().with("sampleId", sample_id))
            .await
    }

    /// GET /3d-models
    pub async fn get_3d_models(&self) -> Result<Vec<ThreeDModel>, ApiError> {
        self.client.call_as(&endpoints::GET_3D_MODELS, CallArgs::new()).await
    }

    /// GET /3d-models/{modelId}
    pub async fn get_3d_model_by_id(&self, model_id: i64) -> Result<ThreeDModelDetail, ApiError> {
        self.client
            .call_as(&endpoints::GET_3D_MODEL_BY_ID, CallArgs::new().with("modelId", model_id))
            .await
    }

    /// Same as `get_3d_model_by_id`, with media type tags lowercased so
    /// `is_image`/`is_video` can be relied on
    pub async fn get_3d_model_details(&self, model_id: i64) -> Result<ThreeDModelDetail, ApiError> {
        let mut detail = self.get_3d_model_by_id(model_id).await?;
        detail.normalize_media();
        Ok(detail)
    }

    /// GET /rock-samples with the set filters as query
    pub async fn get_rock_samples(&self, filters: &RockSampleFilters) -> Result<Vec<RockSpecimen>, ApiError> {
        let args = CallArgs::from_serialize(&filters.clone().normalized())?;
        self.client.call_as(&endpoints::GET_ROCK_SAMPLES, args).await
    }

    /// GET /rock-samples/filters
    pub async fn get_filter_options(&self) -> Result<FilterOptions, ApiError> {
        self.client.call_as(&endpoints::GET_FILTER_OPTIONS, CallArgs::new()).await
    }
}
