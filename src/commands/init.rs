//! Initialize a new site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# spacetraveling configuration

# Site
title: spacetraveling
description: ''
language: pt-BR
timezone: America/Sao_Paulo

# URL
url: http://localhost:4000
root: /

# Directory
public_dir: public
i18n_dir: languages

# Date / Time format (Moment.js style)
date_format: DD MMM YYYY
edited_format: DD MMM YYYY, [às] H:mm

# Content repository
# PRISMIC_API_ENDPOINT and PRISMIC_ACCESS_TOKEN override these
cms:
  endpoint: ''
  document_type: posts
  page_size: 2
  list_fields: [title, subtitle, author]
  # fixtures: posts.json

post_page:
  show_edited_timestamp: true
  show_adjacent_nav: true
  show_comments: true

# Utterances
comments:
  repo: ''
  issue_term: pathname
  theme: github-dark
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("languages"))
        .with_context(|| format!("Failed to create {:?}", target_dir))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::warn!("{:?} already exists, leaving it untouched", config_path);
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)?;
        tracing::info!("Created: {:?}", config_path);
    }

    println!("Site initialized in {:?}", target_dir);
    println!(
        "Set cms.endpoint in _config.yml (or {}) and run `spacetraveling generate`.",
        crate::config::ENDPOINT_ENV
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config: SiteConfig = serde_yaml::from_str(DEFAULT_CONFIG).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.title, defaults.title);
        assert_eq!(config.edited_format, defaults.edited_format);
        assert_eq!(config.cms.fetch_fields(), defaults.cms.fetch_fields());
        assert_eq!(config.post_page, defaults.post_page);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("blog");
        init_site(&site).unwrap();
        assert!(site.join("languages").is_dir());

        fs::write(site.join("_config.yml"), "title: Mine\n").unwrap();
        init_site(&site).unwrap();
        assert_eq!(fs::read_to_string(site.join("_config.yml")).unwrap(), "title: Mine\n");
    }
}
