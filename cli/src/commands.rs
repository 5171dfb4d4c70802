// Command runner
//
// The façade is built once by `App::from_env` and handed to `run` by
// reference.

use rockgeo_api_client::{AiApi, AiConfig, ApiError, ClientConfig, FileUpload, RockApi};
use rockgeo_core::RockSampleFilters;
use serde_json::Value;

use crate::args::Command;

/// API clients shared by all commands
pub struct App {
    pub rock: RockApi,
    /// AI commands report this error when AI_API_KEY is missing
    pub ai: Result<AiApi, ApiError>,
}

impl App {
    pub fn new(rock_config: ClientConfig, ai_config: Result<AiConfig, ApiError>, verbose: bool) -> Result<Self, ApiError> {
        let mut rock = RockApi::from_config(rock_config)?;
        let mut ai = ai_config.and_then(AiApi::new);

        if verbose {
            rock.client_mut().add_logging();
            if let Ok(ai) = ai.as_mut() {
                ai.client_mut().add_logging();
            }
        }

        Ok(Self { rock, ai })
    }

    pub fn from_env(verbose: bool) -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_env()?, AiConfig::from_env(), verbose)
    }

    fn ai(&self) -> Result<&AiApi, ApiError> {
        self.ai.as_ref().map_err(Clone::clone)
    }
}

/// Run one command and return its result as JSON
pub async fn run(app: &App, command: Command) -> anyhow::Result<Value> {
    let rock = &app.rock;
    let output = match command {
        Command::Rock { id } => rock.get_rock_detail(&id).await?,
        Command::Geojson => serde_json::to_value(rock.get_geojson_data().await?)?,
        Command::Related { number } => rock.get_related_rock_info(&number).await?,
        Command::Relations { entity_id } => serde_json::to_value(rock.get_relations(&entity_id).await?)?,
        Command::Sample { sample_id } => serde_json::to_value(rock.get_rock_sample_details(&sample_id).await?)?,
        Command::ThinSection { sample_id } => {
            serde_json::to_value(rock.get_thin_section_details(&sample_id).await?)?
        }
        Command::Xrf { sample_id } => serde_json::to_value(rock.get_xrf_test_results(&sample_id).await?)?,
        Command::Models => serde_json::to_value(rock.get_3d_models().await?)?,
        Command::Model { model_id } => serde_json::to_value(rock.get_3d_model_details(model_id).await?)?,
        Command::Samples(filters) => {
            let filters = RockSampleFilters::from(filters);
            serde_json::to_value(rock.get_rock_samples(&filters).await?)?
        }
        Command::Filters => serde_json::to_value(rock.get_filter_options().await?)?,
        Command::Chat { message, conversation } => {
            let response = app.ai()?.send_chat_message(&message, conversation.as_deref()).await?;
            serde_json::to_value(response)?
        }
        Command::Upload { path } => {
            let upload = FileUpload::from_path(&path).await?;
            serde_json::to_value(app.ai()?.upload_file(upload).await?)?
        }
        Command::PingAi => serde_json::to_value(app.ai()?.test_connection().await)?,
    };
    Ok(output)
}
