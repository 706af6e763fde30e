//! Generator module - renders the post list and post pages to static HTML

use anyhow::{Context as _, Result};
use std::collections::HashMap;
use std::fs;

use tera::Context;

use crate::cms::{ContentRepository, Ordering, Predicate, QueryOptions};
use crate::config::CmsConfig;
use crate::content::{reading_time, Post};
use crate::helpers::{
    absolute_url, date_xml, list_page_path, post_path, site_date, site_timezone, url_for,
};
use crate::i18n::I18n;
use crate::navigation::{self, AdjacentPostRef, AdjacentPosts};
use crate::pagination::PostPagination;
use crate::templates::{
    BodyBlockData, CommentsData, ConfigData, ContentBlockData, NavData, NavPost, PaginationData,
    PostPageData, PostSummaryData, PreviewData, TemplateRenderer,
};
use crate::Blog;

/// Page size used when enumerating every post
const ENUMERATION_PAGE_SIZE: usize = 100;

/// What a generation run produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub list_pages: usize,
    pub posts: usize,
    pub skipped: usize,
}

/// Query the first page of the post list
pub async fn load_first_page(
    repo: &dyn ContentRepository,
    cms: &CmsConfig,
) -> crate::cms::Result<PostPagination> {
    let response = repo
        .query(
            &[Predicate::at("document.type", &cms.document_type)],
            &QueryOptions::new()
                .fetch(cms.fetch_fields())
                .page_size(cms.page_size)
                .order_by(Ordering::desc("document.first_publication_date")),
        )
        .await?;
    Ok(PostPagination::from_response(response))
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    i18n: I18n,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let mut i18n = I18n::new(&blog.config.language);
        i18n.load_languages(blog.base_dir.join(&blog.config.i18n_dir))?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
            i18n,
        })
    }

    /// Generate the entire site
    pub async fn generate(&self, repo: &dyn ContentRepository) -> Result<GenerateSummary> {
        fs::create_dir_all(&self.blog.public_dir)?;

        let list_pages = self.generate_list_pages(repo).await?;
        let (posts, skipped) = self.generate_post_pages(repo).await?;

        let not_found = self.render_not_found()?;
        self.write_page("404.html", &not_found)?;

        Ok(GenerateSummary {
            list_pages,
            posts,
            skipped,
        })
    }

    /// Render the list page sequence: page N shows every post loaded after
    /// N "load more" steps and links to page N + 1 while more remain
    async fn generate_list_pages(&self, repo: &dyn ContentRepository) -> Result<usize> {
        let mut pagination = load_first_page(repo, &self.blog.config.cms)
            .await
            .context("Failed to query the post list")?;
        let mut page_num = 1;

        loop {
            let html = self.render_list_page(&pagination, page_num)?;
            let output = if page_num == 1 {
                "index.html".to_string()
            } else {
                format!("page/{}/index.html", page_num)
            };
            self.write_page(&output, &html)?;

            if !pagination.has_more() {
                break;
            }
            pagination
                .load_next_page(repo)
                .await
                .with_context(|| format!("Failed to load list page {}", page_num + 1))?;
            page_num += 1;
        }

        tracing::info!(
            "Generated {} list pages with {} posts",
            page_num,
            pagination.results.len()
        );
        Ok(page_num)
    }

    /// Render one page per post. Returns (written, skipped).
    async fn generate_post_pages(&self, repo: &dyn ContentRepository) -> Result<(usize, usize)> {
        let cms = &self.blog.config.cms;
        let response = repo
            .query(
                &[Predicate::at("document.type", &cms.document_type)],
                &QueryOptions::new()
                    .fetch([format!("{}.title", cms.document_type)])
                    .page_size(ENUMERATION_PAGE_SIZE),
            )
            .await
            .context("Failed to enumerate posts")?;
        let mut all = PostPagination::from_response(response);
        all.load_all(repo).await.context("Failed to enumerate posts")?;

        let (mut written, mut skipped) = (0, 0);
        for summary in &all.results {
            let uid = summary.uid.as_str();
            if !is_safe_uid(uid) {
                tracing::warn!("Skipping post with unusable uid {:?}", uid);
                skipped += 1;
                continue;
            }

            match self.render_post(repo, uid, None).await? {
                Some(html) => {
                    self.write_page(&format!("post/{}/index.html", uid), &html)?;
                    written += 1;
                }
                None => {
                    tracing::warn!("Post {} disappeared while generating, skipping", uid);
                    skipped += 1;
                }
            }
        }

        Ok((written, skipped))
    }

    /// Fetch and render a post page. `preview_ref` selects a draft
    /// revision and turns on preview mode. Returns `None` when the uid does
    /// not resolve to a document.
    pub async fn render_post(
        &self,
        repo: &dyn ContentRepository,
        uid: &str,
        preview_ref: Option<&str>,
    ) -> Result<Option<String>> {
        let cms = &self.blog.config.cms;
        let document = match repo.get_by_uid(&cms.document_type, uid, preview_ref).await {
            Ok(document) => document,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to fetch post {}", uid)),
        };

        let post = Post::from_document(&document);
        let preview = preview_ref.is_some();

        let adjacent = if self.blog.config.post_page.show_adjacent_nav {
            let adjacent = navigation::resolve(
                repo,
                &cms.document_type,
                post.first_publication_date,
                preview,
            )
            .await
            .with_context(|| format!("Failed to resolve neighbours of {}", uid))?;
            Some(adjacent)
        } else {
            None
        };

        self.render_post_page(&post, adjacent.as_ref(), preview)
            .map(Some)
    }

    /// Render a list page for the current pagination state
    pub fn render_list_page(&self, pagination: &PostPagination, page_num: usize) -> Result<String> {
        let config = &self.blog.config;
        let posts: Vec<PostSummaryData> = pagination
            .results
            .iter()
            .map(|post| PostSummaryData {
                uid: post.uid.clone(),
                title: post.title.clone(),
                subtitle: post.subtitle.clone(),
                author: post.author.clone(),
                date: post
                    .first_publication_date
                    .map(|d| site_date(config, &d, &config.date_format)),
                date_iso: post
                    .first_publication_date
                    .map(|d| date_xml(&d.with_timezone(&site_timezone(config)))),
                path: post_path(config, &post.uid),
            })
            .collect();

        let pagination_data = PaginationData {
            current: page_num,
            current_url: list_page_path(config, page_num),
            next_link: if pagination.has_more() {
                list_page_path(config, page_num + 1)
            } else {
                String::new()
            },
        };

        let mut context = self.create_base_context();
        context.insert("posts", &posts);
        context.insert("pagination", &pagination_data);
        context.insert("canonical", &absolute_url(config, &pagination_data.current_url));

        self.renderer.render("index.html", &context)
    }

    /// Render a post page. Optional sections follow `post_page` in the
    /// site configuration.
    pub fn render_post_page(
        &self,
        post: &Post,
        adjacent: Option<&AdjacentPosts>,
        preview: bool,
    ) -> Result<String> {
        let config = &self.blog.config;
        let options = config.post_page;

        let edited = post
            .last_publication_date
            .filter(|_| options.show_edited_timestamp && post.was_edited())
            .map(|d| site_date(config, &d, &config.edited_format));

        let page = PostPageData {
            uid: post.uid.clone(),
            title: post.title.clone(),
            author: post.author.clone(),
            banner_url: post.banner_url.clone(),
            date: post
                .first_publication_date
                .map(|d| site_date(config, &d, &config.date_format)),
            date_iso: post
                .first_publication_date
                .map(|d| date_xml(&d.with_timezone(&site_timezone(config)))),
            edited,
            reading_time: reading_time::estimate(post),
            content: post
                .content
                .iter()
                .map(|block| ContentBlockData {
                    heading: block.heading.clone(),
                    body: block
                        .body
                        .iter()
                        .map(|b| BodyBlockData {
                            tag: b.tag(),
                            text: b.text.clone(),
                        })
                        .collect(),
                })
                .collect(),
        };

        let nav = adjacent.map(|adjacent| NavData {
            prev: self.nav_post(&adjacent.prev),
            next: self.nav_post(&adjacent.next),
        });

        let comments = (options.show_comments && !config.comments.repo.is_empty()).then(|| {
            CommentsData {
                repo: config.comments.repo.clone(),
                issue_term: config.comments.issue_term.clone(),
                theme: config.comments.theme.clone(),
            }
        });

        let preview = preview.then(|| PreviewData {
            exit_link: post_path(config, &post.uid),
        });

        let mut context = self.create_base_context();
        context.insert("post", &page);
        context.insert("nav", &nav);
        context.insert("comments", &comments);
        context.insert("preview", &preview);
        context.insert("canonical", &absolute_url(config, &post_path(config, &post.uid)));

        self.renderer.render("post.html", &context)
    }

    /// Render the fallback page for unknown posts
    pub fn render_not_found(&self) -> Result<String> {
        let context = self.create_base_context();
        self.renderer.render("404.html", &context)
    }

    fn nav_post(&self, adjacent: &AdjacentPostRef) -> Option<NavPost> {
        let uid = adjacent.uid.as_deref()?;
        Some(NavPost {
            title: adjacent.title.clone().unwrap_or_default(),
            path: post_path(&self.blog.config, uid),
        })
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let config = &self.blog.config;
        let config_data = ConfigData {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: url_for(config, ""),
        };
        let labels: HashMap<String, String> = self.i18n.get_all_translations();

        let mut context = Context::new();
        context.insert("config", &config_data);
        context.insert("i18n", &labels);
        context
    }

    /// Write a rendered page below the public directory
    fn write_page(&self, relative_path: &str, html: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative_path);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

/// Whether a uid can be used as a single output directory name
fn is_safe_uid(uid: &str) -> bool {
    !uid.is_empty() && uid != "." && uid != ".." && !uid.contains(['/', '\\'])
}
