use crate::importer::Post;
use std::io::Write;

/// Write a post as front matter followed by its Markdown body.
///
/// Fields are written as-is; the title is expected to be sanitized already
/// and the content to be converted already.
///
/// `date` is the naive `post_date` in `Display` form (`2021-03-04 05:06:07`),
/// with no zone suffix such as `+0000 UTC`; WordPress stores local time.
pub fn write_post_markdown<W: Write>(writer: &mut W, post: &Post) -> std::io::Result<()> {
    writeln!(writer, "---")?;
    writeln!(writer, "title: {}", post.title)?;
    writeln!(writer, "date: {}", post.created)?;
    writeln!(writer, "draft: {}", post.draft)?;
    writeln!(writer, "slug: {}", post.name)?;
    writeln!(writer, "---")?;
    writeln!(writer)?;
    writeln!(writer, "{}", post.content)?;
    Ok(())
}
