//! Knowledge base configuration management.

use crate::types::KnowledgeBaseConfig;
use ragfile_core::config::STATE_DIR;
use ragfile_core::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Load knowledge base configuration.
///
/// Loads from `.ragfile/knowledge.yaml` if it exists, otherwise returns defaults.
/// The result is validated either way.
pub fn load_config(workspace: &Path) -> AppResult<KnowledgeBaseConfig> {
    let config_path = get_config_path(workspace);

    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path).map_err(|e| {
            AppError::Config(format!("Failed to read config at {:?}: {}", config_path, e))
        })?;

        let config: KnowledgeBaseConfig = serde_yaml::from_str(&content).map_err(|e| {
            AppError::Config(format!("Failed to parse config at {:?}: {}", config_path, e))
        })?;

        tracing::debug!("Loaded knowledge base config from {:?}", config_path);
        config
    } else {
        tracing::debug!("Using default knowledge base config (no config file found)");
        KnowledgeBaseConfig::default()
    };

    config.validate()?;
    Ok(config)
}

/// Save knowledge base configuration.
pub fn save_config(workspace: &Path, config: &KnowledgeBaseConfig) -> AppResult<()> {
    let config_path = get_config_path(workspace);

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    let yaml = serde_yaml::to_string(config)?;

    fs::write(&config_path, yaml).map_err(|e| {
        AppError::Config(format!("Failed to write config to {:?}: {}", config_path, e))
    })?;

    tracing::debug!("Saved knowledge base config to {:?}", config_path);
    Ok(())
}

/// Get the path to the knowledge base config file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(STATE_DIR).join("knowledge.yaml")
}

/// Resolve the object storage root against the workspace.
pub fn get_storage_root(workspace: &Path, config: &KnowledgeBaseConfig) -> PathBuf {
    let root = Path::new(&config.storage_root);
    if root.is_absolute() {
        root.to_path_buf()
    } else {
        workspace.join(root)
    }
}
