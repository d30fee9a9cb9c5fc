//! Timeline export parsing.
//!
//! Handles the Premiere-style `xmeml` sequence export: nested
//! `<video><track><clipitem>` elements carrying frame boundaries and a
//! `<pathurl>` source reference. Only the first video track is read; overlay
//! scoring works off the main camera track and ignores B-roll tracks.
//!
//! ```xml
//! <xmeml version="4">
//!   <sequence>
//!     <media>
//!       <video>
//!         <track>
//!           <clipitem>
//!             <name>point_001.mp4</name>
//!             <start>0</start>
//!             <end>300</end>
//!             <in>120</in>
//!             <out>420</out>
//!             <file><pathurl>file://localhost/media/point_001.mp4</pathurl></file>
//!           </clipitem>
//!         </track>
//!       </video>
//!     </media>
//!   </sequence>
//! </xmeml>
//! ```

use std::path::Path;

use matchcut_core::{Clip, Error, Result};

/// Parse a timeline export file into clips, in timeline order.
///
/// # Errors
///
/// [`Error::Parse`] when the file cannot be read or is not well-formed XML.
/// A well-formed export without video tracks yields an empty list (the
/// length-mismatch warning downstream covers that case).
pub fn parse_timeline(path: &Path) -> Result<Vec<Clip>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::parse(path, format!("cannot read file: {e}")))?;
    parse_timeline_xml(&contents).map_err(|message| Error::parse(path, message))
}

/// Parse timeline XML text. Split out from [`parse_timeline`] so tests can
/// feed strings directly.
pub fn parse_timeline_xml(xml: &str) -> std::result::Result<Vec<Clip>, String> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| format!("XML parse error: {e}"))?;

    // First <video> element, then its first <track>.
    let Some(video) = doc
        .descendants()
        .find(|n| n.is_element() && n.has_tag_name("video"))
    else {
        tracing::warn!("Timeline export has no <video> element; no clips parsed");
        return Ok(Vec::new());
    };

    let Some(track) = video
        .children()
        .find(|n| n.is_element() && n.has_tag_name("track"))
    else {
        tracing::warn!("Timeline export has no video <track>; no clips parsed");
        return Ok(Vec::new());
    };

    let clips: Vec<Clip> = track
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("clipitem"))
        .map(parse_clipitem)
        .collect();

    tracing::debug!("Parsed {} clips from first video track", clips.len());
    Ok(clips)
}

fn parse_clipitem(item: roxmltree::Node) -> Clip {
    Clip {
        name: child_text(item, "name").unwrap_or("Unknown").to_string(),
        start_frame: child_frame(item, "start"),
        end_frame: child_frame(item, "end"),
        in_frame: child_frame(item, "in"),
        out_frame: child_frame(item, "out"),
        source_path: source_pathurl(item).unwrap_or_default(),
    }
}

/// Text of the first direct child element with the given tag name.
fn child_text<'a, 'input>(node: roxmltree::Node<'a, 'input>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .map(str::trim)
}

/// Frame-number child, defaulting to 0 when absent or non-numeric.
fn child_frame(node: roxmltree::Node, name: &str) -> i64 {
    child_text(node, name)
        .and_then(|t| t.parse().ok())
        .unwrap_or(0)
}

/// The `<pathurl>` under the clip item's `<file>` element.
fn source_pathurl(item: roxmltree::Node) -> Option<String> {
    let file = item
        .descendants()
        .find(|n| n.is_element() && n.has_tag_name("file"))?;
    file.children()
        .find(|n| n.is_element() && n.has_tag_name("pathurl"))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
}
