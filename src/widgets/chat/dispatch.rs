// Rendering dispatch - value to renderable, deterministically
//
// The candidate chain is explicit and inspectable: caller-supplied
// renderers in order, then the strategy selected from the MIME type, then
// the generic renderer as the unconditional safety net. A candidate that
// errors is discarded and the next one is tried; candidate failures never
// surface to the caller.

use crate::widgets::chat::content::{sniff_mime, Value};
use crate::widgets::chat::renderable::Renderable;
use anyhow::{bail, Context, Result};
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A caller-supplied rendering strategy: value in, renderable out, or an
/// error to make dispatch move on to the next candidate.
pub type Renderer = Box<dyn Fn(&Value) -> Result<Renderable> + Send>;

/// Temporary resources acquired while rendering.
///
/// The audio strategy materializes its payload to a backing file; the entry
/// that triggered the render owns these and drops them exactly once when it
/// is torn down, removing the files.
#[derive(Default)]
pub struct Disposables {
    temp_files: Vec<NamedTempFile>,
}

impl Disposables {
    /// Take ownership of a temp file, returning its path for the renderable
    fn hold(&mut self, file: NamedTempFile) -> PathBuf {
        let path = file.path().to_path_buf();
        self.temp_files.push(file);
        path
    }

    pub fn len(&self) -> usize {
        self.temp_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temp_files.is_empty()
    }
}

impl std::fmt::Debug for Disposables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposables")
            .field("temp_files", &self.temp_files.len())
            .finish()
    }
}

/// Builtin strategy selected from a MIME type, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Document,
    Audio,
    Video,
    Image,
    Table,
    Generic,
}

/// Map a MIME type to a builtin strategy.
///
/// Checked in the documented order: exact PDF, audio prefix, video prefix,
/// image prefix, csv suffix. Text types decode upstream and fall through to
/// generic, as does anything unmatched.
pub fn select_strategy(mime: &str) -> Strategy {
    if mime == "application/pdf" {
        Strategy::Document
    } else if mime.starts_with("audio/") {
        Strategy::Audio
    } else if mime.starts_with("video/") {
        Strategy::Video
    } else if mime.starts_with("image/") {
        Strategy::Image
    } else if mime.ends_with("/csv") {
        Strategy::Table
    } else {
        Strategy::Generic
    }
}

/// Render a value through the full candidate chain.
///
/// The winning representation is post-processed with `default_tags`
/// (see [`Renderable::apply_default_attrs`]). A pre-built composite is
/// terminal: it passes through unchanged and unprocessed.
pub fn render_value(
    value: &Value,
    renderers: &[Renderer],
    scratch: &mut Disposables,
    default_tags: &[&str],
) -> Renderable {
    if let Value::Panel(panel) = value {
        return panel.clone();
    }

    let (prepared, strategy) = classify(value);

    for (index, renderer) in renderers.iter().enumerate() {
        match renderer(&prepared) {
            Ok(mut panel) => {
                panel.apply_default_attrs(default_tags);
                return panel;
            }
            Err(error) => {
                tracing::debug!(candidate = index, %error, "render candidate failed");
            }
        }
    }

    match apply_strategy(strategy, &prepared, scratch) {
        Ok(mut panel) => {
            panel.apply_default_attrs(default_tags);
            panel
        }
        Err(error) => {
            tracing::debug!(?strategy, %error, "builtin strategy failed, using generic");
            let mut panel = generic_panel(&prepared);
            panel.apply_default_attrs(default_tags);
            panel
        }
    }
}

/// Determine the MIME type and prepare the value for rendering.
///
/// File records carry a declared type; raw bytes are sniffed (failure to
/// sniff is non-fatal and leaves the type undetermined). Text-typed bytes
/// are decoded here so every downstream candidate sees a string.
fn classify(value: &Value) -> (Value, Strategy) {
    let mime = match value {
        Value::File(file) => Some(file.mime_type.clone()),
        Value::Bytes(data) => sniff_mime(data).map(str::to_string),
        _ => None,
    };

    let Some(mime) = mime else {
        return (value.clone(), Strategy::Generic);
    };

    if mime.starts_with("text") {
        if let Some((data, _)) = payload(value) {
            if let Ok(text) = std::str::from_utf8(&data) {
                return (Value::Text(text.to_string()), Strategy::Generic);
            }
        }
        return (value.clone(), Strategy::Generic);
    }

    (value.clone(), select_strategy(&mime))
}

/// The byte payload and display name behind a value, if it has one
fn payload(value: &Value) -> Option<(Bytes, String)> {
    match value {
        Value::File(file) => Some((file.contents.clone(), file.file_name.clone())),
        Value::Bytes(data) => Some((data.clone(), "payload".to_string())),
        _ => None,
    }
}

fn apply_strategy(
    strategy: Strategy,
    value: &Value,
    scratch: &mut Disposables,
) -> Result<Renderable> {
    match strategy {
        Strategy::Document => document_panel(value),
        Strategy::Audio => audio_panel(value, scratch),
        Strategy::Video => video_panel(value),
        Strategy::Image => image_panel(value),
        Strategy::Table => table_panel(value),
        Strategy::Generic => Ok(generic_panel(value)),
    }
}

fn document_panel(value: &Value) -> Result<Renderable> {
    let (data, name) = payload(value).context("document strategy needs a byte payload")?;
    if data.is_empty() {
        bail!("empty document payload");
    }
    Ok(Renderable::Document {
        data,
        name,
        style: Default::default(),
    })
}

/// Audio is materialized to a temporary backing file owned by the entry's
/// disposal list; the renderable only carries the path.
fn audio_panel(value: &Value, scratch: &mut Disposables) -> Result<Renderable> {
    let (data, name) = payload(value).context("audio strategy needs a byte payload")?;
    if data.is_empty() {
        bail!("empty audio payload");
    }

    let suffix = Path::new(&name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| ".mp3".to_string());
    let mut file = tempfile::Builder::new()
        .prefix("dashkit-audio-")
        .suffix(&suffix)
        .tempfile()
        .context("create audio backing file")?;
    file.write_all(&data).context("write audio backing file")?;
    file.flush()?;

    let path = scratch.hold(file);
    Ok(Renderable::Audio {
        path,
        name,
        style: Default::default(),
    })
}

fn video_panel(value: &Value) -> Result<Renderable> {
    let (data, name) = payload(value).context("video strategy needs a byte payload")?;
    if data.is_empty() {
        bail!("empty video payload");
    }
    Ok(Renderable::Video {
        data,
        name,
        style: Default::default(),
    })
}

fn image_panel(value: &Value) -> Result<Renderable> {
    let (data, name) = payload(value).context("image strategy needs a byte payload")?;
    if data.is_empty() {
        bail!("empty image payload");
    }
    Ok(Renderable::Image {
        data,
        name,
        style: Default::default(),
    })
}

fn table_panel(value: &Value) -> Result<Renderable> {
    let (data, _) = payload(value).context("table strategy needs a byte payload")?;
    let text = std::str::from_utf8(&data).context("csv payload is not UTF-8")?;
    let (headers, rows) = parse_csv(text);
    if headers.is_empty() {
        bail!("csv payload has no header row");
    }
    Ok(Renderable::Table {
        headers,
        rows,
        style: Default::default(),
    })
}

/// The contract's safety net: always produces a renderable.
pub fn generic_panel(value: &Value) -> Renderable {
    match value {
        Value::Text(text) => Renderable::markdown(text.clone()),
        Value::Bytes(data) => Renderable::text(format!("binary payload ({} bytes)", data.len())),
        Value::File(file) => Renderable::text(format!(
            "📄 {} ({} bytes, {})",
            file.file_name,
            file.contents.len(),
            file.mime_type
        )),
        Value::Panel(panel) => panel.clone(),
    }
}

/// Minimal CSV: comma-separated, double-quoted fields with `""` escapes.
fn parse_csv(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let headers = lines.next().map(parse_csv_row).unwrap_or_default();
    let rows = lines.map(parse_csv_row).collect();
    (headers, rows)
}

fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::chat::content::FileInput;
    use crate::widgets::chat::renderable::MESSAGE_TAG;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

    fn file_value(contents: &'static [u8], name: &str, mime: &str) -> Value {
        Value::File(FileInput::new(Bytes::from_static(contents), name, mime))
    }

    #[test]
    fn test_declared_image_mime_selects_image_renderer() {
        let value = file_value(PNG_MAGIC, "shot.png", "image/png");
        let mut scratch = Disposables::default();
        let panel = render_value(&value, &[], &mut scratch, &[]);
        assert!(matches!(panel, Renderable::Image { .. }));
    }

    #[test]
    fn test_unmatched_mime_falls_to_generic() {
        let value = file_value(b"{\"a\":1}", "data.json", "application/json");
        let mut scratch = Disposables::default();
        let panel = render_value(&value, &[], &mut scratch, &[]);
        let text = panel.text_content().expect("generic text leaf");
        assert!(text.contains("data.json"));
    }

    #[test]
    fn test_text_mime_decodes_and_renders_as_markdown() {
        let value = file_value(b"# Title\nbody", "note.md", "text/markdown");
        let mut scratch = Disposables::default();
        let panel = render_value(&value, &[], &mut scratch, &[]);
        assert_eq!(panel.text_content(), Some("# Title\nbody"));
        assert!(panel.style().has_tag(MESSAGE_TAG));
    }

    #[test]
    fn test_csv_suffix_parses_into_table() {
        let value = file_value(
            b"name,score\n\"Ada, Dr.\",10\nGrace,9",
            "scores.csv",
            "text/csv",
        );
        let mut scratch = Disposables::default();
        let panel = render_value(&value, &[], &mut scratch, &[]);
        match panel {
            Renderable::Table { headers, rows, .. } => {
                assert_eq!(headers, vec!["name", "score"]);
                assert_eq!(rows[0], vec!["Ada, Dr.", "10"]);
                assert_eq!(rows[1], vec!["Grace", "9"]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_audio_materializes_to_backing_file() {
        let value = file_value(b"ID3fake-mp3-data", "clip.mp3", "audio/mpeg");
        let mut scratch = Disposables::default();
        let panel = render_value(&value, &[], &mut scratch, &[]);

        let Renderable::Audio { path, .. } = &panel else {
            panic!("expected audio, got {panel:?}");
        };
        assert_eq!(scratch.len(), 1);
        assert_eq!(std::fs::read(path).unwrap(), b"ID3fake-mp3-data");
    }

    #[test]
    fn test_sniffed_bytes_route_like_declared_mime() {
        let value = Value::Bytes(Bytes::from_static(PNG_MAGIC));
        let mut scratch = Disposables::default();
        let panel = render_value(&value, &[], &mut scratch, &[]);
        assert!(matches!(panel, Renderable::Image { .. }));
    }

    #[test]
    fn test_caller_renderer_wins_over_builtin() {
        let custom: Renderer = Box::new(|_| Ok(Renderable::text("custom")));
        let value = file_value(PNG_MAGIC, "shot.png", "image/png");
        let mut scratch = Disposables::default();
        let panel = render_value(&value, &[custom], &mut scratch, &[]);
        assert_eq!(panel.text_content(), Some("custom"));
    }

    #[test]
    fn test_failing_caller_renderer_is_skipped() {
        let broken: Renderer = Box::new(|_| bail!("nope"));
        let value = file_value(PNG_MAGIC, "shot.png", "image/png");
        let mut scratch = Disposables::default();
        let panel = render_value(&value, &[broken], &mut scratch, &[]);
        assert!(matches!(panel, Renderable::Image { .. }));
    }

    #[test]
    fn test_every_candidate_failing_ends_at_generic() {
        let broken: Renderer = Box::new(|_| bail!("nope"));
        // Empty image payload makes the builtin strategy fail too
        let value = file_value(b"", "empty.png", "image/png");
        let mut scratch = Disposables::default();
        let panel = render_value(&value, &[broken], &mut scratch, &[]);
        assert!(panel.text_content().is_some());
    }

    #[test]
    fn test_composite_passes_through_unchanged() {
        let composite = Renderable::column(vec![Renderable::text("pre-built")]);
        let value = Value::Panel(composite.clone());
        let mut scratch = Disposables::default();
        let panel = render_value(&value, &[], &mut scratch, &["chat-entry"]);
        // No post-processing tags on a passthrough
        assert_eq!(panel, composite);
    }

    #[test]
    fn test_generic_never_fails_on_odd_input() {
        let panel = generic_panel(&Value::Bytes(Bytes::from_static(&[0, 159, 146, 150])));
        assert!(panel.text_content().unwrap().contains("4 bytes"));
    }

    #[test]
    fn test_strategy_precedence_order() {
        assert_eq!(select_strategy("application/pdf"), Strategy::Document);
        assert_eq!(select_strategy("audio/ogg"), Strategy::Audio);
        assert_eq!(select_strategy("video/mp4"), Strategy::Video);
        assert_eq!(select_strategy("image/gif"), Strategy::Image);
        assert_eq!(select_strategy("application/csv"), Strategy::Table);
        assert_eq!(select_strategy("application/json"), Strategy::Generic);
    }
}
