//! Generator module - generates static HTML files using built-in Tera templates

use anyhow::{Context as _, Result};
use std::fs;
use std::path::PathBuf;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{filter_by_tag, unique_tags, ArticleMetadata, ArticleRepository};
use crate::helpers::{self, full_url_for, url_for, TagSlugs};
use crate::i18n::I18n;
use crate::templates::{
    ArticleData, ArticlePageData, ConfigData, MenuItemData, TagData, TemplateRenderer,
};
use crate::Blog;

/// A rendered page waiting to be written, keyed by its site path
struct RenderedPage {
    /// Site path without root, e.g. `blog/hello/`
    path: String,
    /// Output file below the public directory
    output: PathBuf,
    html: String,
}

/// Counts reported after a successful build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub articles: usize,
    pub tags: usize,
    pub pages: usize,
    pub assets: usize,
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    repository: ArticleRepository,
    i18n: I18n,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config.language)?;
        let mut i18n = I18n::new(&blog.config.language)?;
        i18n.load_languages(&blog.languages_dir)?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
            repository: blog.repository(),
            i18n,
        })
    }

    /// Generate the entire site
    ///
    /// Every page is rendered in memory first; nothing is written unless
    /// all articles parse and render.
    pub fn generate(&self) -> Result<GenerateStats> {
        let articles = self.repository.list_articles()?;
        let ids = self.repository.list_article_ids()?;
        let tags = unique_tags(&articles);
        let slugs = TagSlugs::new(&tags);

        tracing::info!("Loaded {} articles and {} tags", articles.len(), tags.len());

        let mut pages = Vec::new();
        pages.push(self.render_home(&articles, &tags, &slugs)?);
        pages.push(self.render_listing(&articles, &tags, &slugs, None)?);
        for tag in &tags {
            pages.push(self.render_listing(&articles, &tags, &slugs, Some(tag))?);
        }
        for id in &ids {
            pages.push(self.render_article(id, &slugs)?);
        }
        pages.push(self.render_about()?);
        pages.push(self.render_not_found()?);

        fs::create_dir_all(&self.blog.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.blog.public_dir))?;

        let assets = self.copy_static_assets()?;

        for page in &pages {
            let output_path = self.blog.public_dir.join(&page.output);
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create dir {:?}", parent))?;
            }
            fs::write(&output_path, &page.html)
                .with_context(|| format!("Failed to write {:?}", output_path))?;
            tracing::debug!("Generated /{}: {:?}", page.path, output_path);
        }

        Ok(GenerateStats {
            articles: ids.len(),
            tags: tags.len(),
            pages: pages.len(),
            assets,
        })
    }

    /// Context shared by every page
    fn create_base_context(&self, current_path: &str) -> Context {
        let config = &self.blog.config;

        let menu: Vec<MenuItemData> = config
            .menu
            .iter()
            .map(|item| {
                let path = item.path.trim_start_matches('/');
                MenuItemData {
                    name: self.i18n.get(&item.name),
                    path: url_for(config, path),
                    active: !path.is_empty() && current_path.starts_with(path),
                }
            })
            .collect();

        let mut context = Context::new();
        context.insert("config", &ConfigData::new(config));
        context.insert("menu", &menu);
        context.insert("t", &self.i18n.to_tree());
        context.insert("current_path", &url_for(config, current_path));
        context.insert("canonical", &full_url_for(config, current_path));
        context.insert("current_year", &chrono::Local::now().format("%Y").to_string());
        context.insert("page_title", "");
        context.insert("page_description", "");
        context
    }

    fn page(&self, path: String, template: &str, context: &Context) -> Result<RenderedPage> {
        let html = self
            .renderer
            .render(template, context)
            .with_context(|| format!("Failed to render /{}", path))?;
        let output = PathBuf::from(&path).join("index.html");
        Ok(RenderedPage { path, output, html })
    }

    fn article_data(&self, articles: &[ArticleMetadata], slugs: &TagSlugs) -> Vec<ArticleData> {
        articles
            .iter()
            .map(|article| ArticleData::new(&self.blog.config, slugs, article))
            .collect()
    }

    fn tag_data(&self, tags: &[String], slugs: &TagSlugs, active: Option<&str>) -> Vec<TagData> {
        tags.iter()
            .map(|tag| {
                TagData::new(&self.blog.config, slugs, tag, active == Some(tag.as_str()))
            })
            .collect()
    }

    /// Home page: most recent articles and every tag
    fn render_home(
        &self,
        articles: &[ArticleMetadata],
        tags: &[String],
        slugs: &TagSlugs,
    ) -> Result<RenderedPage> {
        let recent = &articles[..articles.len().min(self.blog.config.recent_count)];

        let mut context = self.create_base_context("");
        context.insert("articles", &self.article_data(recent, slugs));
        context.insert("tags", &self.tag_data(tags, slugs, None));

        self.page(String::new(), "index.html", &context)
    }

    /// Article listing, optionally narrowed to one tag
    fn render_listing(
        &self,
        articles: &[ArticleMetadata],
        tags: &[String],
        slugs: &TagSlugs,
        tag: Option<&str>,
    ) -> Result<RenderedPage> {
        let config = &self.blog.config;
        let path = match tag {
            Some(tag) => helpers::tag_path(config, &slugs.get(tag)),
            None => helpers::blog_path(config),
        };

        let listed = filter_by_tag(articles, tag);

        let mut context = self.create_base_context(&path);
        context.insert("page_title", &tag.unwrap_or(&self.i18n.get("blog.title")));
        context.insert("articles", &self.article_data(&listed, slugs));
        context.insert("tags", &self.tag_data(tags, slugs, tag));
        context.insert("active_tag", &tag);
        context.insert("blog_url", &url_for(config, &helpers::blog_path(config)));

        self.page(path, "blog.html", &context)
    }

    /// Detail page of a single article
    fn render_article(&self, id: &str, slugs: &TagSlugs) -> Result<RenderedPage> {
        let config = &self.blog.config;
        let article = self.repository.get_article(id)?;
        let path = helpers::article_path(config, id);

        let mut context = self.create_base_context(&path);
        context.insert("page_title", &article.metadata.title);
        context.insert("page_description", &article.metadata.description);
        context.insert("article", &ArticlePageData::new(config, slugs, &article));

        self.page(path, "article.html", &context)
    }

    /// About page from the optional `about.md`
    fn render_about(&self) -> Result<RenderedPage> {
        let about_file = &self.blog.about_file;
        let content = if about_file.is_file() {
            let markdown = fs::read_to_string(about_file)
                .with_context(|| format!("Failed to read {:?}", about_file))?;
            self.repository
                .renderer()
                .render(&markdown)
                .with_context(|| format!("Failed to render {:?}", about_file))?
        } else {
            tracing::debug!("No about page at {:?}, using placeholder", about_file);
            String::new()
        };

        let mut context = self.create_base_context("about/");
        context.insert("page_title", &self.i18n.get("about.title"));
        context.insert("content", &content);

        self.page("about/".to_string(), "about.html", &context)
    }

    /// Build-time 404 page for ids that were never generated
    fn render_not_found(&self) -> Result<RenderedPage> {
        let mut context = self.create_base_context("404.html");
        context.insert("page_title", &self.i18n.get("not_found.title"));
        context.insert("canonical", "");

        let html = self.renderer.render("404.html", &context)?;
        Ok(RenderedPage {
            path: "404.html".to_string(),
            output: PathBuf::from("404.html"),
            html,
        })
    }

    /// Copy static assets (stylesheets, images) to the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.is_dir() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir).follow_links(true) {
            let entry = entry.with_context(|| format!("Failed to read {:?}", static_dir))?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
            copied += 1;
        }

        tracing::debug!("Copied {} static assets from {:?}", copied, static_dir);
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn article(title: &str, date: &str, tag: Option<&str>, body: &str) -> String {
        let tag_line = tag.map(|t| format!("tag: {}\n", t)).unwrap_or_default();
        format!("---\ntitle: {title}\ndate: {date}\ndescription: About {title}\n{tag_line}---\n{body}")
    }

    fn sample_site() -> TempDir {
        let dir = TempDir::new().unwrap();
        let content = "content/blog";
        write(
            dir.path(),
            &format!("{content}/a.md"),
            &article("Go notes", "2023-01-01", Some("go"), "# A\n"),
        );
        write(
            dir.path(),
            &format!("{content}/b.md"),
            &article("Rust notes", "2023-06-01", Some("rust"), "```rust\nfn main() {}\n```\n"),
        );
        write(
            dir.path(),
            &format!("{content}/c.md"),
            &article("Untagged", "2023-06-01", None, "Plain text.\n"),
        );
        write(dir.path(), "content/about.md", "Hi, I write about *code*.\n");
        write(dir.path(), "static/css/style.css", "body {}\n");
        dir
    }

    fn blog(dir: &Path) -> Blog {
        let mut config = SiteConfig::default();
        config.language = "en".to_string();
        config.recent_count = 2;
        Blog::with_config(dir, config)
    }

    #[test]
    fn test_generate_site() {
        let dir = sample_site();
        let blog = blog(dir.path());
        let stats = Generator::new(&blog).unwrap().generate().unwrap();

        assert_eq!(
            stats,
            GenerateStats {
                articles: 3,
                tags: 2,
                // home, listing, 2 tag listings, 3 articles, about, 404
                pages: 9,
                assets: 1,
            }
        );

        let public = &blog.public_dir;
        for path in [
            "index.html",
            "blog/index.html",
            "blog/tag/rust/index.html",
            "blog/tag/go/index.html",
            "blog/a/index.html",
            "blog/b/index.html",
            "blog/c/index.html",
            "about/index.html",
            "404.html",
            "css/style.css",
        ] {
            assert!(public.join(path).is_file(), "missing {}", path);
        }
    }

    #[test]
    fn test_home_page_lists_recent_articles_and_tags() {
        let dir = sample_site();
        let blog = blog(dir.path());
        Generator::new(&blog).unwrap().generate().unwrap();

        let home = fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        assert!(home.contains("Rust notes"));
        assert!(home.contains("Untagged"));
        // recent_count = 2
        assert!(!home.contains("Go notes"));

        let rust = home.find(r#"href="/blog/tag/rust/""#).unwrap();
        let go = home.find(r#"href="/blog/tag/go/""#).unwrap();
        assert!(rust < go);
    }

    #[test]
    fn test_tag_listing_is_filtered() {
        let dir = sample_site();
        let blog = blog(dir.path());
        Generator::new(&blog).unwrap().generate().unwrap();

        let listing = fs::read_to_string(blog.public_dir.join("blog/tag/go/index.html")).unwrap();
        assert!(listing.contains("Go notes"));
        assert!(!listing.contains("Rust notes"));
        assert!(listing.contains("Category: go"));

        let all = fs::read_to_string(blog.public_dir.join("blog/index.html")).unwrap();
        let b = all.find("Rust notes").unwrap();
        let c = all.find("Untagged").unwrap();
        let a = all.find("Go notes").unwrap();
        assert!(b < c && c < a);
    }

    #[test]
    fn test_article_and_about_pages() {
        let dir = sample_site();
        let blog = blog(dir.path());
        Generator::new(&blog).unwrap().generate().unwrap();

        let page = fs::read_to_string(blog.public_dir.join("blog/b/index.html")).unwrap();
        assert!(page.contains("<title>Rust notes | Blog</title>"));
        assert!(page.contains(r#"<figure class="highlight rust">"#));
        assert!(page.contains("1 June, 2023"));
        assert!(page.contains("navigation-list-item--active"));

        let about = fs::read_to_string(blog.public_dir.join("about/index.html")).unwrap();
        assert!(about.contains("<em>code</em>"));
    }

    #[test]
    fn test_generation_is_all_or_nothing() {
        let dir = sample_site();
        write(dir.path(), "content/blog/broken.md", "no front matter\n");
        let blog = blog(dir.path());

        let err = Generator::new(&blog).unwrap().generate().unwrap_err();
        assert!(err.to_string().contains("broken.md"));
        assert!(!blog.public_dir.exists());
    }

    #[test]
    fn test_render_error_aborts_generation() {
        let dir = sample_site();
        write(
            dir.path(),
            "content/blog/open.md",
            &article("Open", "2020-01-01", None, "```\nnever closed\n"),
        );
        let blog = blog(dir.path());

        let err = Generator::new(&blog).unwrap().generate().unwrap_err();
        assert!(err.to_string().contains("open.md"));
        assert!(!blog.public_dir.exists());
    }

    #[test]
    fn test_tags_sharing_a_slug_get_their_own_listing() {
        let dir = TempDir::new().unwrap();
        for (id, date, tag) in [
            ("x", "2023-03-01", "C++"),
            ("y", "2023-02-01", "C#"),
            ("z", "2023-01-01", "C"),
        ] {
            write(
                dir.path(),
                &format!("content/blog/{id}.md"),
                &format!("---\ntitle: Post {id}\ndate: {date}\ndescription: d\ntag: \"{tag}\"\n---\nBody\n"),
            );
        }
        let blog = blog(dir.path());

        let stats = Generator::new(&blog).unwrap().generate().unwrap();
        assert_eq!(stats.tags, 3);

        for (slug, title) in [("c", "Post x"), ("c-2", "Post y"), ("c-3", "Post z")] {
            let listing = fs::read_to_string(
                blog.public_dir.join(format!("blog/tag/{slug}/index.html")),
            )
            .unwrap();
            assert!(listing.contains(title), "{} should list {}", slug, title);
            assert_eq!(listing.matches("article-preview-title").count(), 1);
        }

        let page = fs::read_to_string(blog.public_dir.join("blog/y/index.html")).unwrap();
        assert!(page.contains(r#"href="/blog/tag/c-2/""#));
    }

    #[test]
    fn test_canonical_and_stylesheet_links() {
        let dir = sample_site();
        let mut config = SiteConfig::default();
        config.url = "https://olgaletova.ru".to_string();
        config.stylesheets = vec![
            "css/style.css".to_string(),
            "https://fonts.example.com/inter.css".to_string(),
        ];
        let blog = Blog::with_config(dir.path(), config);
        Generator::new(&blog).unwrap().generate().unwrap();

        let page = fs::read_to_string(blog.public_dir.join("blog/a/index.html")).unwrap();
        assert!(page.contains(r#"<link rel="canonical" href="https://olgaletova.ru/blog/a/">"#));
        assert!(page.contains(r#"<link rel="stylesheet" href="/css/style.css">"#));
        assert!(page.contains(r#"<link rel="stylesheet" href="https://fonts.example.com/inter.css">"#));
    }
}
