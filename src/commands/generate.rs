//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Generate the static site
pub fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog)?;
    let stats = generator.generate()?;

    tracing::info!(
        "Generated {} pages for {} articles and {} tags, copied {} assets",
        stats.pages,
        stats.articles,
        stats.tags,
        stats.assets
    );

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
