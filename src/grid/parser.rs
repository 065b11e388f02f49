//! Parser for the build master's transposed grid ("tgrid") page
//!
//! The page is a table with one row per revision:
//!
//! ```text
//! <tr>
//!   <td valign="bottom" class="sourcestamp">1568</td>
//!   <td class="build success"><a href="builders/Android/builds/119">OK</a></td>
//!   <td class="build failure"><a href="builders/Linux/builds/54">failed</a></td>
//! </tr>
//! ```
//!
//! Parsing runs in two bounded passes. The first splits the page into
//! revision blocks (sourcestamp cell up to the closing `</tr>`), the second
//! scans each block for build cells. Cells whose link text is not one of
//! `OK`, `failed` or `building` are skipped. The only error is a page that
//! yields no build status at all.

use super::status::{BuildResult, BuildStatus, GridKey, StatusGrid};
use log::debug;
use thiserror::Error;

/// Number of characters of the offending page kept in a `ParseError`
pub const EXCERPT_LIMIT: usize = 500;

const REVISION_ANCHOR: &str = "class=\"sourcestamp\">";
const CELL_OPEN: &str = "<td";
const CELL_CLOSE: &str = "</td>";
const ROW_CLOSE: &str = "</tr>";
const BUILD_LINK: &str = "<a href=\"builders/";
const BUILDS_SEGMENT: &str = "/builds/";
const LINK_END: &str = "\">";
const ANCHOR_CLOSE: &str = "</a>";

/// The page contained no recognizable build status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not find any build statuses in {excerpt}")]
pub struct ParseError {
    excerpt: String,
}

impl ParseError {
    fn new(html: &str) -> Self {
        let mut excerpt: String = html.chars().take(EXCERPT_LIMIT).collect();
        if html.chars().nth(EXCERPT_LIMIT).is_some() {
            excerpt.push_str("...");
        }
        ParseError { excerpt }
    }

    /// Leading part of the rejected page
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }
}

/// One revision row: the revision number and everything up to `</tr>`
#[derive(Debug, PartialEq)]
struct RevisionBlock<'a> {
    revision: &'a str,
    body: &'a str,
}

/// A matched build cell, `consumed` bytes past the start of the link target
struct BuildCell<'a> {
    bot: &'a str,
    build_number: &'a str,
    status: BuildStatus,
    consumed: usize,
}

/// Parse a tgrid page into a status grid
///
/// # Example
///
/// ```
/// use buildwatch::grid::parse_tgrid_page;
///
/// let html = r#"<tr><td class="sourcestamp">1568</td><td class="build success"><a href="builders/Linux/builds/119">OK</a></td></tr>"#;
/// let grid = parse_tgrid_page(html).unwrap();
/// assert_eq!(grid.to_flat_map()["1568--Linux"], "119--OK");
/// ```
pub fn parse_tgrid_page(html: &str) -> Result<StatusGrid, ParseError> {
    let mut grid = StatusGrid::new();

    for block in split_revision_blocks(html) {
        let builds = parse_builds(block.revision, block.body);
        debug!("Revision {}: {} build(s)", block.revision, builds.len());
        grid.merge(builds);
    }

    if grid.is_empty() {
        return Err(ParseError::new(html));
    }

    Ok(grid)
}

/// First pass: find `<td ... class="sourcestamp">DIGITS</td> ... </tr>` blocks
fn split_revision_blocks(html: &str) -> Vec<RevisionBlock<'_>> {
    let mut blocks = Vec::new();
    // End of the previous block; a new block needs its own `<td` after it.
    let mut cursor = 0;
    let mut search_from = 0;

    while let Some(found) = html[search_from..].find(REVISION_ANCHOR) {
        let anchor = search_from + found;
        search_from = anchor + REVISION_ANCHOR.len();

        if !html[cursor..anchor].contains(CELL_OPEN) {
            debug!("Sourcestamp at byte {} has no enclosing cell", anchor);
            continue;
        }

        let after = &html[search_from..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || !after[digits..].starts_with(CELL_CLOSE) {
            debug!("Sourcestamp at byte {} is not a revision number", anchor);
            continue;
        }

        let body_start = search_from + digits + CELL_CLOSE.len();
        let Some(body_len) = html[body_start..].find(ROW_CLOSE) else {
            debug!("Revision {} is missing its closing row tag", &after[..digits]);
            break;
        };

        blocks.push(RevisionBlock {
            revision: &after[..digits],
            body: &html[body_start..body_start + body_len],
        });
        cursor = body_start + body_len + ROW_CLOSE.len();
        search_from = cursor;
    }

    blocks
}

/// Second pass: collect the build cells of one revision block
fn parse_builds(revision: &str, body: &str) -> StatusGrid {
    let mut grid = StatusGrid::new();
    // End of the previous matched cell; the next one needs its own `<td ...>`.
    let mut cursor = 0;
    let mut search_from = 0;

    while let Some(found) = body[search_from..].find(BUILD_LINK) {
        let link = search_from + found;
        search_from = link + BUILD_LINK.len();

        if !has_cell_opening(&body[cursor..link]) {
            continue;
        }

        let Some(cell) = parse_build_cell(&body[search_from..]) else {
            continue;
        };

        grid.insert(
            GridKey {
                revision: revision.to_string(),
                bot: cell.bot.to_string(),
            },
            BuildResult {
                build_number: cell.build_number.to_string(),
                status: cell.status,
            },
        );
        cursor = search_from + cell.consumed;
        search_from = cursor;
    }

    grid
}

fn has_cell_opening(region: &str) -> bool {
    region
        .find(CELL_OPEN)
        .map_or(false, |pos| region[pos + CELL_OPEN.len()..].contains('>'))
}

/// Parse `BOT/builds/NUM">STATUS</a> ... </td>`, the text following `<a href="builders/`
fn parse_build_cell(rest: &str) -> Option<BuildCell<'_>> {
    let href_len = rest.find(LINK_END)?;
    let (bot, build_number) = rest[..href_len].rsplit_once(BUILDS_SEGMENT)?;
    if bot.is_empty() || build_number.is_empty() || !build_number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let label_start = href_len + LINK_END.len();
    let label_len = rest[label_start..].find(ANCHOR_CLOSE)?;
    let label = &rest[label_start..label_start + label_len];
    let status = match label.parse::<BuildStatus>() {
        Ok(status) => status,
        Err(_) => {
            debug!("Skipping {} build {} with status '{}'", bot, build_number, label);
            return None;
        }
    };

    let link_end = label_start + label_len + ANCHOR_CLOSE.len();
    let close = rest[link_end..].find(CELL_CLOSE)?;

    Some(BuildCell {
        bot,
        build_number,
        status,
        consumed: link_end + close + CELL_CLOSE.len(),
    })
}
