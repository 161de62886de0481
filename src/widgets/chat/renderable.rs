// Renderable tree - what a rendering strategy produces
//
// A small tree of containers and typed leaves. The chat view walks it to
// draw the entry; the message widget keeps one cached tree per value and
// streams tokens into it through a precomputed path.
//
// Streaming design: instead of guessing the append target by duck-typed
// descent at every token, the path to the last string-bearing leaf is
// computed once when the tree is built (skipping media leaves), and each
// token is an O(1) indexed append through that path.

use bytes::Bytes;
use std::path::PathBuf;

/// Style tag attached to non-empty text leaves during post-processing
pub const MESSAGE_TAG: &str = "message";

/// Height, in terminal rows, given to media/table leaves with no explicit
/// height
pub const DEFAULT_LEAF_HEIGHT: u16 = 12;

/// Presentation attributes carried by every node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeStyle {
    /// Free-form style tags ("message", "chat-entry", ...)
    pub tags: Vec<String>,
    /// Stretch to the full available width
    pub fill_width: bool,
    /// Explicit width in columns
    pub width: Option<u16>,
    /// Explicit height in rows
    pub height: Option<u16>,
}

impl NodeStyle {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn add_tag(&mut self, tag: &str) {
        if !self.has_tag(tag) {
            self.tags.push(tag.to_string());
        }
    }
}

/// One node of the rendered representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    /// Vertical container
    Column {
        children: Vec<Renderable>,
        style: NodeStyle,
    },
    /// Horizontal container
    Row {
        children: Vec<Renderable>,
        style: NodeStyle,
    },
    /// Text body; rendered through the markdown pipeline when `markdown`
    Text {
        text: String,
        markdown: bool,
        style: NodeStyle,
    },
    /// Image payload held in memory
    Image {
        data: Bytes,
        name: String,
        style: NodeStyle,
    },
    /// Audio payload materialized to a temporary backing file
    Audio {
        path: PathBuf,
        name: String,
        style: NodeStyle,
    },
    /// Video payload held in memory
    Video {
        data: Bytes,
        name: String,
        style: NodeStyle,
    },
    /// Embedded document (PDF) payload held in memory
    Document {
        data: Bytes,
        name: String,
        style: NodeStyle,
    },
    /// Tabular data parsed from CSV
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        style: NodeStyle,
    },
}

impl Renderable {
    pub fn text(text: impl Into<String>) -> Self {
        Renderable::Text {
            text: text.into(),
            markdown: false,
            style: NodeStyle::default(),
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Renderable::Text {
            text: text.into(),
            markdown: true,
            style: NodeStyle::default(),
        }
    }

    pub fn column(children: Vec<Renderable>) -> Self {
        Renderable::Column {
            children,
            style: NodeStyle::default(),
        }
    }

    pub fn row(children: Vec<Renderable>) -> Self {
        Renderable::Row {
            children,
            style: NodeStyle::default(),
        }
    }

    pub fn style(&self) -> &NodeStyle {
        match self {
            Renderable::Column { style, .. }
            | Renderable::Row { style, .. }
            | Renderable::Text { style, .. }
            | Renderable::Image { style, .. }
            | Renderable::Audio { style, .. }
            | Renderable::Video { style, .. }
            | Renderable::Document { style, .. }
            | Renderable::Table { style, .. } => style,
        }
    }

    pub fn style_mut(&mut self) -> &mut NodeStyle {
        match self {
            Renderable::Column { style, .. }
            | Renderable::Row { style, .. }
            | Renderable::Text { style, .. }
            | Renderable::Image { style, .. }
            | Renderable::Audio { style, .. }
            | Renderable::Video { style, .. }
            | Renderable::Document { style, .. }
            | Renderable::Table { style, .. } => style,
        }
    }

    pub fn children(&self) -> Option<&[Renderable]> {
        match self {
            Renderable::Column { children, .. } | Renderable::Row { children, .. } => {
                Some(children)
            }
            _ => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Renderable>> {
        match self {
            Renderable::Column { children, .. } | Renderable::Row { children, .. } => {
                Some(children)
            }
            _ => None,
        }
    }

    /// Text content when this node is a text leaf
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Renderable::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Media leaves are never streaming targets
    pub fn is_media_leaf(&self) -> bool {
        matches!(
            self,
            Renderable::Image { .. }
                | Renderable::Audio { .. }
                | Renderable::Video { .. }
                | Renderable::Document { .. }
        )
    }

    // ─── Post-processing ─────────────────────────────────────────────

    /// Apply the default presentation attributes after dispatch.
    ///
    /// Containers receive the default tags and propagate them to every
    /// child. Non-empty text leaves get the "message" tag and keep their
    /// natural (suppressed) sizing. Media and table leaves default to
    /// filling the available width at a fixed height.
    pub fn apply_default_attrs(&mut self, default_tags: &[&str]) {
        if let Some(children) = self.children_mut() {
            for child in children.iter_mut() {
                child.apply_default_attrs(default_tags);
            }
            let style = self.style_mut();
            for tag in default_tags {
                style.add_tag(tag);
            }
            return;
        }

        for tag in default_tags {
            self.style_mut().add_tag(tag);
        }

        match self {
            Renderable::Text { text, style, .. } => {
                if !text.is_empty() {
                    style.add_tag(MESSAGE_TAG);
                }
                style.fill_width = false;
            }
            other => {
                let style = other.style_mut();
                if !style.fill_width && style.width.is_none() {
                    style.fill_width = true;
                }
                if style.height.is_none() {
                    style.height = Some(DEFAULT_LEAF_HEIGHT);
                }
            }
        }
    }

    // ─── Streaming path ──────────────────────────────────────────────

    /// Path (child indices, root first) to the last string-bearing leaf.
    ///
    /// The search walks containers from their last child backwards,
    /// descending depth-first and skipping media leaves, so a trailing
    /// image never shadows the text before it. `None` when the tree holds
    /// no text leaf at all.
    pub fn text_leaf_path(&self) -> Option<Vec<usize>> {
        match self {
            Renderable::Text { .. } => Some(Vec::new()),
            Renderable::Column { children, .. } | Renderable::Row { children, .. } => {
                for (index, child) in children.iter().enumerate().rev() {
                    if let Some(mut path) = child.text_leaf_path() {
                        path.insert(0, index);
                        return Some(path);
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// The node a path points at
    pub fn node_at(&self, path: &[usize]) -> Option<&Renderable> {
        let mut node = self;
        for &index in path {
            node = node.children()?.get(index)?;
        }
        Some(node)
    }

    /// Append a token to the text leaf a path points at.
    ///
    /// Returns false (and changes nothing) when the path no longer resolves
    /// to a text leaf. Appending never replaces existing content.
    pub fn append_text_at(&mut self, path: &[usize], token: &str) -> bool {
        let mut node = self;
        for &index in path {
            node = match node.children_mut().and_then(|c| c.get_mut(index)) {
                Some(child) => child,
                None => return false,
            };
        }
        match node {
            Renderable::Text { text, .. } => {
                text.push_str(token);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_plain_text_is_root() {
        let tree = Renderable::text("hi");
        assert_eq!(tree.text_leaf_path(), Some(vec![]));
    }

    #[test]
    fn test_path_skips_trailing_image() {
        let tree = Renderable::column(vec![
            Renderable::markdown("body"),
            Renderable::Image {
                data: Bytes::from_static(b"png"),
                name: "pic.png".into(),
                style: NodeStyle::default(),
            },
        ]);
        assert_eq!(tree.text_leaf_path(), Some(vec![0]));
    }

    #[test]
    fn test_path_descends_into_last_container() {
        let tree = Renderable::column(vec![
            Renderable::text("first"),
            Renderable::row(vec![Renderable::text("a"), Renderable::text("b")]),
        ]);
        assert_eq!(tree.text_leaf_path(), Some(vec![1, 1]));
    }

    #[test]
    fn test_path_backtracks_out_of_textless_container() {
        // Last child is a container of only media; the previous sibling wins
        let image = Renderable::Image {
            data: Bytes::from_static(b"x"),
            name: "x.png".into(),
            style: NodeStyle::default(),
        };
        let tree = Renderable::column(vec![
            Renderable::text("only text"),
            Renderable::column(vec![image.clone(), image]),
        ]);
        assert_eq!(tree.text_leaf_path(), Some(vec![0]));
    }

    #[test]
    fn test_no_text_leaf_yields_no_path() {
        let tree = Renderable::column(vec![Renderable::Image {
            data: Bytes::from_static(b"x"),
            name: "x.png".into(),
            style: NodeStyle::default(),
        }]);
        assert_eq!(tree.text_leaf_path(), None);
    }

    #[test]
    fn test_append_only_touches_target_leaf() {
        let mut tree = Renderable::column(vec![
            Renderable::text("left"),
            Renderable::text("right"),
        ]);
        let path = tree.text_leaf_path().unwrap();
        assert!(tree.append_text_at(&path, "!"));

        assert_eq!(tree.node_at(&[0]).unwrap().text_content(), Some("left"));
        assert_eq!(tree.node_at(&[1]).unwrap().text_content(), Some("right!"));
    }

    #[test]
    fn test_append_rejects_stale_path() {
        let mut tree = Renderable::text("hi");
        assert!(!tree.append_text_at(&[3], "x"));
        assert_eq!(tree.text_content(), Some("hi"));
    }

    #[test]
    fn test_default_attrs_tag_nonempty_text_only() {
        let mut filled = Renderable::text("hello");
        filled.apply_default_attrs(&["chat-entry"]);
        assert!(filled.style().has_tag(MESSAGE_TAG));
        assert!(filled.style().has_tag("chat-entry"));
        assert!(!filled.style().fill_width);

        let mut empty = Renderable::text("");
        empty.apply_default_attrs(&[]);
        assert!(!empty.style().has_tag(MESSAGE_TAG));
    }

    #[test]
    fn test_default_attrs_size_media_leaves() {
        let mut image = Renderable::Image {
            data: Bytes::from_static(b"png"),
            name: "p.png".into(),
            style: NodeStyle::default(),
        };
        image.apply_default_attrs(&[]);
        assert!(image.style().fill_width);
        assert_eq!(image.style().height, Some(DEFAULT_LEAF_HEIGHT));

        // An explicit height survives post-processing
        let mut sized = Renderable::Image {
            data: Bytes::from_static(b"png"),
            name: "p.png".into(),
            style: NodeStyle {
                height: Some(4),
                ..NodeStyle::default()
            },
        };
        sized.apply_default_attrs(&[]);
        assert_eq!(sized.style().height, Some(4));
    }

    #[test]
    fn test_default_attrs_propagate_through_containers() {
        let mut tree = Renderable::column(vec![
            Renderable::text("body"),
            Renderable::row(vec![Renderable::text("nested")]),
        ]);
        tree.apply_default_attrs(&["chat-entry"]);

        assert!(tree.style().has_tag("chat-entry"));
        assert!(tree.node_at(&[0]).unwrap().style().has_tag("chat-entry"));
        let nested = tree.node_at(&[1, 0]).unwrap();
        assert!(nested.style().has_tag("chat-entry"));
        assert!(nested.style().has_tag(MESSAGE_TAG));
    }
}
