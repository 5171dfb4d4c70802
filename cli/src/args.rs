// Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rockgeo_core::RockSampleFilters;

#[derive(Debug, Parser)]
#[command(name = "rockgeo", version, about = "Query the rock sample backend and the AI assistant")]
pub struct Cli {
    /// Log every request and response
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write daily-rolling log files into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rock detail by id
    Rock { id: String },
    /// GeoJSON layer of all rock locations
    Geojson,
    /// Related rock information by number
    Related { number: String },
    /// Relations of a rock sample, strongest first
    Relations { entity_id: String },
    /// Rock sample basic information
    Sample { sample_id: String },
    /// Thin-section identification report
    ThinSection { sample_id: String },
    /// XRF test results
    Xrf { sample_id: String },
    /// List 3D models
    Models,
    /// 3D model with its media files
    Model { model_id: i64 },
    /// Search rock specimens
    Samples(SampleFilterArgs),
    /// Available specimen filter values
    Filters,
    /// Ask the AI assistant
    Chat {
        message: String,
        #[arg(long)]
        conversation: Option<String>,
    },
    /// Upload a file to the AI service
    Upload { path: PathBuf },
    /// Check the AI service connection
    PingAi,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SampleFilterArgs {
    /// Basic name (substring)
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    /// Main component (substring)
    #[arg(long)]
    pub component: Option<String>,
    #[arg(long)]
    pub grain_size: Option<String>,
    #[arg(long)]
    pub structure: Option<String>,
    #[arg(long)]
    pub mineral: Option<String>,
    #[arg(long)]
    pub system: Option<String>,
    #[arg(long)]
    pub formation: Option<String>,
}

impl From<SampleFilterArgs> for RockSampleFilters {
    fn from(args: SampleFilterArgs) -> Self {
        RockSampleFilters {
            basic_name: args.name,
            category: args.category,
            color: args.color,
            main_component: args.component,
            grain_size: args.grain_size,
            special_structure: args.structure,
            special_mineral: args.mineral,
            system: args.system,
            formation: args.formation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rock_command() {
        let cli = Cli::try_parse_from(["rockgeo", "-v", "rock", "42"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Rock { id } if id == "42"));
    }

    #[test]
    fn test_parse_samples_filters() {
        let cli = Cli::try_parse_from(["rockgeo", "samples", "--color", "灰色", "--category", "沉积岩"]).unwrap();
        let Command::Samples(args) = cli.command else {
            panic!("Expected samples command");
        };
        let filters = RockSampleFilters::from(args);
        assert_eq!(filters.color.as_deref(), Some("灰色"));
        assert_eq!(filters.category.as_deref(), Some("沉积岩"));
        assert!(filters.basic_name.is_none());
    }

    #[test]
    fn test_parse_chat_with_conversation() {
        let cli = Cli::try_parse_from(["rockgeo", "chat", "你好", "--conversation", "c-1"]).unwrap();
        match cli.command {
            Command::Chat { message, conversation } => {
                assert_eq!(message, "你好");
                assert_eq!(conversation.as_deref(), Some("c-1"));
            }
            other => panic!("Expected chat command, got {:?}", other),
        }
    }

    #[test]
    fn test_model_id_must_be_numeric() {
        assert!(Cli::try_parse_from(["rockgeo", "model", "abc"]).is_err());
    }
}
