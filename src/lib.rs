//! spacetraveling: a static blog generator backed by a headless CMS
//!
//! Posts live in a Prismic-compatible content repository. This crate
//! fetches them, builds a "load more" post list and one page per post with
//! reading time and previous/next navigation, and renders everything with
//! embedded Tera templates.

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod navigation;
pub mod pagination;
pub mod server;
pub mod templates;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cms::{ContentRepository, MemoryRepository, PrismicClient};

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)
                .with_context(|| format!("Failed to load {:?}", config_path))?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env_overrides();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Open the configured content repository
    pub fn repository(&self) -> Result<Arc<dyn ContentRepository>> {
        let cms = &self.config.cms;

        if let Some(fixtures) = &cms.fixtures {
            let path = self.base_dir.join(fixtures);
            tracing::info!("Reading content from {:?}", path);
            let repo = MemoryRepository::load(&path)
                .with_context(|| format!("Failed to load fixtures {:?}", path))?;
            return Ok(Arc::new(repo));
        }

        if cms.endpoint.is_empty() {
            anyhow::bail!(
                "No CMS endpoint configured: set cms.endpoint in _config.yml or {}",
                config::ENDPOINT_ENV
            );
        }
        let client = PrismicClient::new(&cms.endpoint, cms.access_token.clone())
            .with_context(|| format!("Invalid CMS endpoint {:?}", cms.endpoint))?;
        Ok(Arc::new(client))
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::init_site(&self.base_dir)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
