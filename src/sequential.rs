use crate::converter::{ConvertError, Html2Md, HtmlConverter};
use crate::exporter;
use crate::importer::{self, Post};
use crate::utils::{ExportConfig, sanitize_title};
use eyre::Result;
use log::{debug, error, info};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: usize,
    pub failed: usize,
}

/// Why a single post produced no file.
#[derive(Debug)]
pub enum PostError {
    Convert(ConvertError),
    Render(io::Error),
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for PostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostError::Convert(e) => write!(f, "{}", e),
            PostError::Render(e) => write!(f, "failed to render post: {}", e),
            PostError::Write { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for PostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PostError::Convert(e) => Some(e),
            PostError::Render(e) => Some(e),
            PostError::Write { source, .. } => Some(source),
        }
    }
}

/// The main entry point for the business logic.
/// Failures opening or reading the database are fatal; per-post failures are
/// logged and counted.
pub fn execute(config: &ExportConfig) -> Result<ExportSummary> {
    info!("reading {}", config.db_path.display());

    let posts = {
        let conn = importer::open_db(&config.db_path)?;
        importer::read_posts(&conn, &config.table_prefix)?
    };

    info!("processing {} posts", posts.len());
    let summary = export_posts(posts, &config.target_dir, &Html2Md);
    info!("done: {} written, {} failed", summary.written, summary.failed);
    Ok(summary)
}

pub fn export_posts(
    posts: Vec<Post>,
    target_dir: &Path,
    converter: &dyn HtmlConverter,
) -> ExportSummary {
    let mut summary = ExportSummary::default();
    for post in posts {
        let name = post.name.clone();
        match export_post(post, target_dir, converter) {
            Ok(path) => {
                info!("wrote {}", path.display());
                summary.written += 1;
            }
            Err(e) => {
                error!("post {}: {}", name, e);
                summary.failed += 1;
            }
        }
    }
    summary
}

fn export_post(
    mut post: Post,
    target_dir: &Path,
    converter: &dyn HtmlConverter,
) -> Result<PathBuf, PostError> {
    debug!("converting post {} by {}", post.name, post.author);
    post.content = converter.convert(&post.content).map_err(PostError::Convert)?;
    post.title = sanitize_title(&post.title);

    let mut rendered = Vec::with_capacity(post.content.len() + 128);
    exporter::write_post_markdown(&mut rendered, &post).map_err(PostError::Render)?;

    let path = target_dir.join(format!("{}.md", post.name));
    fs::write(&path, &rendered).map_err(|source| PostError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
