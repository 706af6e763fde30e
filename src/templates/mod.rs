//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary, so a site needs nothing but its
//! `_config.yml` and a content repository to build.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
            ("404.html", include_str!("site/404.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/post_nav.html",
                include_str!("site/partials/post_nav.html"),
            ),
            (
                "partials/comments.html",
                include_str!("site/partials/comments.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

/// One entry of the post list
#[derive(Debug, Clone, Serialize)]
pub struct PostSummaryData {
    pub uid: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,
    pub date: Option<String>,
    pub date_iso: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub current: usize,
    pub current_url: String,
    /// Empty once every post is listed
    pub next_link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub uid: String,
    pub title: String,
    pub author: String,
    pub banner_url: Option<String>,
    pub date: Option<String>,
    pub date_iso: Option<String>,
    /// Formatted last publication date, when the edit line is shown
    pub edited: Option<String>,
    pub reading_time: u32,
    pub content: Vec<ContentBlockData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentBlockData {
    pub heading: String,
    pub body: Vec<BodyBlockData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BodyBlockData {
    pub tag: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavData {
    pub prev: Option<NavPost>,
    pub next: Option<NavPost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentsData {
    pub repo: String,
    pub issue_term: String,
    pub theme: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewData {
    pub exit_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: "spacetraveling".to_string(),
                description: String::new(),
                language: "pt-BR".to_string(),
                url: "http://localhost:4000".to_string(),
                root: "/".to_string(),
            },
        );
        let i18n: HashMap<String, String> = crate::i18n::I18n::default().get_all_translations();
        context.insert("i18n", &i18n);
        context
    }

    #[test]
    fn test_render_index_escapes_and_links() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert(
            "posts",
            &vec![PostSummaryData {
                uid: "hooks".to_string(),
                title: "Hooks <3".to_string(),
                subtitle: None,
                author: "Joseph".to_string(),
                date: Some("15 mar 2021".to_string()),
                date_iso: Some("2021-03-15T16:25:28.000-03:00".to_string()),
                path: "/post/hooks/".to_string(),
            }],
        );
        context.insert(
            "pagination",
            &PaginationData {
                current: 1,
                current_url: "/".to_string(),
                next_link: "/page/2/".to_string(),
            },
        );

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains("Hooks &lt;3"));
        assert!(html.contains(r#"href="/post/hooks/""#));
        assert!(html.contains("15 mar 2021"));
        assert!(html.contains(r#"href="/page/2/""#));
        assert!(html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_render_post_without_optional_sections() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert(
            "post",
            &PostPageData {
                uid: "hooks".to_string(),
                title: "Hooks".to_string(),
                author: "Joseph".to_string(),
                banner_url: None,
                date: None,
                date_iso: None,
                edited: None,
                reading_time: 3,
                content: vec![ContentBlockData {
                    heading: "Intro".to_string(),
                    body: vec![BodyBlockData {
                        tag: "li",
                        text: "item".to_string(),
                    }],
                }],
            },
        );
        context.insert("nav", &None::<NavData>);
        context.insert("comments", &None::<CommentsData>);
        context.insert("preview", &None::<PreviewData>);

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("<h1>Hooks</h1>"));
        assert!(html.contains("3 min"));
        assert!(html.contains("<li>item</li>"));
        assert!(!html.contains("banner"));
        assert!(!html.contains("post-nav"));
        assert!(!html.contains("utteranc.es"));
        assert!(!html.contains("Sair do modo Preview"));
    }

    #[test]
    fn test_every_label_is_used_by_a_template() {
        let sources = [
            include_str!("site/layout.html"),
            include_str!("site/index.html"),
            include_str!("site/post.html"),
            include_str!("site/404.html"),
            include_str!("site/partials/header.html"),
            include_str!("site/partials/post_nav.html"),
            include_str!("site/partials/comments.html"),
        ]
        .concat();

        for lang in ["pt-BR", "en"] {
            for key in crate::i18n::I18n::new(lang).get_all_translations().keys() {
                assert!(
                    sources.contains(&format!("i18n.{}", key)),
                    "label {} ({}) is not used by any template",
                    key,
                    lang
                );
            }
        }
    }
}
