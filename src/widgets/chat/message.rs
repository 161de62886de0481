// The chat message entry
//
// Owns one message payload plus its display metadata, and keeps exactly one
// cached rendered representation per value. The cache is rebuilt whenever
// the value is replaced; `stream()` instead appends into the cached tree
// through the precomputed path so a token never re-renders the entry.

use crate::reactive::{ChangeSet, Watchers};
use crate::widgets::chat::avatar::{self, AvatarLookup};
use crate::widgets::chat::content::Value;
use crate::widgets::chat::dispatch::{render_value, Disposables, Renderer};
use crate::widgets::chat::renderable::Renderable;
use crate::widgets::WidgetError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Display format for the timestamp footer
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M";

/// Style tag propagated to every node of the rendered value
const ENTRY_TAG: &str = "chat-entry";

/// Fields of the entry, for change tracking and watchers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatField {
    Value,
    User,
    Avatar,
    Reactions,
    Timestamp,
}

/// A partial field update; only the populated fields are applied.
#[derive(Debug, Default)]
pub struct FieldPatch {
    pub value: Option<Value>,
    pub user: Option<String>,
    pub avatar: Option<String>,
    pub reactions: Option<Vec<String>>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// The three input shapes `update()` accepts.
pub enum Update {
    /// Replace only the value
    Value(Value),
    /// Merge a partial field mapping
    Fields(FieldPatch),
    /// Copy another entry's full field set
    Entry(Box<ChatMessage>),
}

impl From<Value> for Update {
    fn from(value: Value) -> Self {
        Update::Value(value)
    }
}

impl From<&str> for Update {
    fn from(text: &str) -> Self {
        Update::Value(Value::Text(text.to_string()))
    }
}

impl From<String> for Update {
    fn from(text: String) -> Self {
        Update::Value(Value::Text(text))
    }
}

impl From<FieldPatch> for Update {
    fn from(patch: FieldPatch) -> Self {
        Update::Fields(patch)
    }
}

impl From<ChatMessage> for Update {
    fn from(entry: ChatMessage) -> Self {
        Update::Entry(Box::new(entry))
    }
}

/// A chat message with avatar, timestamp, and reaction metadata.
pub struct ChatMessage {
    value: Value,
    user: String,
    avatar: Option<String>,
    avatar_lookup: Option<AvatarLookup>,
    default_avatars: HashMap<String, String>,
    resolved_avatar: String,
    reactions: Vec<String>,
    reaction_icons: HashMap<String, String>,
    timestamp: DateTime<Utc>,
    timestamp_format: String,
    renderers: Vec<Renderer>,

    // Presentation-only visibility flags
    pub show_avatar: bool,
    pub show_user: bool,
    pub show_timestamp: bool,
    pub show_reaction_icons: bool,
    pub show_copy_icon: bool,

    // Derived: the one cached rendering of the current value, and the
    // streaming path into it
    value_panel: Renderable,
    stream_path: Option<Vec<usize>>,

    // Temp resources acquired by renderers; dropped once at teardown
    scratch: Disposables,

    needs_render: bool,
    changes: ChangeSet<ChatField>,
    watchers: Watchers<ChatField>,
}

impl ChatMessage {
    pub fn new(value: impl Into<Value>) -> Self {
        let mut entry = Self {
            value: value.into(),
            user: "User".to_string(),
            avatar: None,
            avatar_lookup: None,
            default_avatars: HashMap::new(),
            resolved_avatar: String::new(),
            reactions: Vec::new(),
            reaction_icons: HashMap::from([("favorite".to_string(), "♥".to_string())]),
            timestamp: Utc::now(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            renderers: Vec::new(),
            show_avatar: true,
            show_user: true,
            show_timestamp: true,
            show_reaction_icons: true,
            show_copy_icon: true,
            value_panel: Renderable::text(""),
            stream_path: None,
            scratch: Disposables::default(),
            needs_render: true,
            changes: ChangeSet::new(),
            watchers: Watchers::new(),
        };
        entry.resolve_avatar();
        entry.refresh();
        entry
    }

    // ─── Builders ────────────────────────────────────────────────────

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.set_user(user.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.set_avatar(Some(avatar.into()));
        self
    }

    /// Override table lookup with a custom user -> avatar function
    pub fn with_avatar_lookup(mut self, lookup: impl Fn(&str) -> String + Send + 'static) -> Self {
        self.avatar_lookup = Some(Box::new(lookup));
        if self.avatar.is_none() {
            self.resolve_avatar();
            self.changes.mark(ChatField::Avatar);
            self.refresh();
        }
        self
    }

    /// Overlay entries on the built-in avatar table (caller entries win)
    pub fn with_default_avatars(mut self, avatars: HashMap<String, String>) -> Self {
        self.default_avatars = avatars;
        if self.avatar.is_none() {
            self.resolve_avatar();
            self.changes.mark(ChatField::Avatar);
            self.refresh();
        }
        self
    }

    pub fn with_reactions(mut self, reactions: Vec<String>) -> Self {
        self.reactions = reactions;
        self.changes.mark(ChatField::Reactions);
        self.refresh();
        self
    }

    pub fn with_reaction_icons(mut self, icons: HashMap<String, String>) -> Self {
        self.reaction_icons = icons;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self.changes.mark(ChatField::Timestamp);
        self.refresh();
        self
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Caller-supplied renderers, tried before the builtin strategy
    pub fn with_renderers(mut self, renderers: Vec<Renderer>) -> Self {
        self.renderers = renderers;
        self.needs_render = true;
        self.changes.mark(ChatField::Value);
        self.refresh();
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// The avatar to display: explicit if set, resolved otherwise
    pub fn avatar(&self) -> &str {
        match &self.avatar {
            Some(avatar) => avatar,
            None => &self.resolved_avatar,
        }
    }

    pub fn reactions(&self) -> &[String] {
        &self.reactions
    }

    /// Icons for the active reactions, falling back to the reaction name
    pub fn reaction_glyphs(&self) -> Vec<String> {
        self.reactions
            .iter()
            .map(|name| {
                self.reaction_icons
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| name.clone())
            })
            .collect()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn timestamp_label(&self) -> String {
        self.timestamp.format(&self.timestamp_format).to_string()
    }

    /// The cached rendered representation of the current value
    pub fn rendered(&self) -> &Renderable {
        &self.value_panel
    }

    /// Text available for the copy icon.
    ///
    /// The cached panel is the sole source: only a text-like leaf at its
    /// root offers copyable content.
    pub fn copy_text(&self) -> Option<String> {
        if !self.show_copy_icon {
            return None;
        }
        self.value_panel.text_content().map(str::to_string)
    }

    /// Message metadata as JSON, for copy-as-data workflows
    pub fn copy_data(&self) -> Option<String> {
        let body = serde_json::json!({
            "user": self.user,
            "timestamp": self.timestamp.to_rfc3339(),
            "reactions": self.reactions,
            "text": self.value_panel.text_content(),
        });
        serde_json::to_string(&body).ok()
    }

    pub fn watchers_mut(&mut self) -> &mut Watchers<ChatField> {
        &mut self.watchers
    }

    // ─── Mutations ───────────────────────────────────────────────────

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
        self.needs_render = true;
        self.changes.mark(ChatField::Value);
        self.refresh();
    }

    pub fn set_user(&mut self, user: impl Into<String>) {
        self.user = user.into();
        self.changes.mark(ChatField::User);
        if self.avatar.is_none() {
            self.resolve_avatar();
        }
        self.refresh();
    }

    /// Set or clear the explicit avatar; clearing re-resolves from the user
    pub fn set_avatar(&mut self, avatar: Option<String>) {
        self.avatar = avatar;
        if self.avatar.is_none() {
            self.resolve_avatar();
        }
        self.changes.mark(ChatField::Avatar);
        self.refresh();
    }

    /// Toggle a reaction on or off
    pub fn toggle_reaction(&mut self, name: &str) {
        if let Some(index) = self.reactions.iter().position(|r| r == name) {
            self.reactions.remove(index);
        } else {
            self.reactions.push(name.to_string());
        }
        self.changes.mark(ChatField::Reactions);
        self.refresh();
    }

    /// Apply one of the three update shapes atomically, then re-render.
    ///
    /// `user`/`avatar` override the patched values for the mapping shape and
    /// are rejected with [`WidgetError::ConflictingOverride`] when combined
    /// with a full entry.
    pub fn update(
        &mut self,
        update: impl Into<Update>,
        user: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<(), WidgetError> {
        let mut patch = match update.into() {
            Update::Entry(entry) => {
                if user.is_some() || avatar.is_some() {
                    return Err(WidgetError::ConflictingOverride);
                }
                self.adopt(*entry);
                return Ok(());
            }
            Update::Value(value) => FieldPatch {
                value: Some(value),
                ..FieldPatch::default()
            },
            Update::Fields(patch) => patch,
        };

        if let Some(user) = user {
            patch.user = Some(user.to_string());
        }
        if let Some(avatar) = avatar {
            patch.avatar = Some(avatar.to_string());
        }
        self.apply_patch(patch);
        Ok(())
    }

    /// Stream a token into the entry.
    ///
    /// Plain text values grow in place and their cached panel follows; a
    /// composite value is appended at its last text leaf through the stored
    /// path. Appending never replaces content; an entry whose rendering has
    /// no text leaf drops the token with a warning.
    pub fn stream(&mut self, token: &str) {
        let Some(path) = self.stream_path.clone() else {
            tracing::warn!(user = %self.user, "stream target has no text leaf, token dropped");
            return;
        };

        match &mut self.value {
            Value::Text(text) => {
                text.push_str(token);
            }
            Value::Panel(tree) => {
                tree.append_text_at(&path, token);
            }
            // Bytes/file values only mutate their rendered form
            _ => {}
        }
        self.value_panel.append_text_at(&path, token);
        self.changes.mark(ChatField::Value);
        self.refresh();
    }

    // ─── Internal ────────────────────────────────────────────────────

    /// Copy another entry's full field set, re-rendering from its value
    fn adopt(&mut self, other: ChatMessage) {
        let ChatMessage {
            value,
            user,
            avatar,
            avatar_lookup,
            default_avatars,
            reactions,
            reaction_icons,
            timestamp,
            timestamp_format,
            renderers,
            show_avatar,
            show_user,
            show_timestamp,
            show_reaction_icons,
            show_copy_icon,
            ..
        } = other;

        self.value = value;
        self.user = user;
        self.avatar = avatar;
        self.avatar_lookup = avatar_lookup;
        self.default_avatars = default_avatars;
        self.reactions = reactions;
        self.reaction_icons = reaction_icons;
        self.timestamp = timestamp;
        self.timestamp_format = timestamp_format;
        self.renderers = renderers;
        self.show_avatar = show_avatar;
        self.show_user = show_user;
        self.show_timestamp = show_timestamp;
        self.show_reaction_icons = show_reaction_icons;
        self.show_copy_icon = show_copy_icon;

        if self.avatar.is_none() {
            self.resolve_avatar();
        }
        self.needs_render = true;
        for field in [
            ChatField::Value,
            ChatField::User,
            ChatField::Avatar,
            ChatField::Reactions,
            ChatField::Timestamp,
        ] {
            self.changes.mark(field);
        }
        self.refresh();
    }

    fn apply_patch(&mut self, patch: FieldPatch) {
        if let Some(value) = patch.value {
            self.value = value;
            self.needs_render = true;
            self.changes.mark(ChatField::Value);
        }
        if let Some(user) = patch.user {
            self.user = user;
            self.changes.mark(ChatField::User);
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
            self.changes.mark(ChatField::Avatar);
        }
        if let Some(reactions) = patch.reactions {
            self.reactions = reactions;
            self.changes.mark(ChatField::Reactions);
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
            self.changes.mark(ChatField::Timestamp);
        }
        if self.avatar.is_none() && self.changes.contains(ChatField::User) {
            self.resolve_avatar();
        }
        self.refresh();
    }

    fn resolve_avatar(&mut self) {
        self.resolved_avatar = match &self.avatar_lookup {
            Some(lookup) => lookup(&self.user),
            None => avatar::resolve(&self.user, &self.default_avatars),
        };
    }

    /// Single re-render entry point: rebuild the cached panel when the
    /// value was replaced, then notify watchers of the drained changes.
    fn refresh(&mut self) {
        if self.needs_render {
            self.value_panel = render_value(
                &self.value,
                &self.renderers,
                &mut self.scratch,
                &[ENTRY_TAG],
            );
            self.stream_path = self.value_panel.text_leaf_path();
            self.needs_render = false;
        }
        if self.changes.is_dirty() {
            let changed = self.changes.take();
            self.watchers.notify_all(&changed);
        }
    }
}

impl std::fmt::Debug for ChatMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatMessage")
            .field("user", &self.user)
            .field("avatar", &self.avatar())
            .field("reactions", &self.reactions)
            .field("timestamp", &self.timestamp)
            .field("scratch", &self.scratch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::chat::content::FileInput;
    use bytes::Bytes;

    #[test]
    fn test_stream_appends_to_plain_text_value() {
        let mut entry = ChatMessage::new("hi");
        entry.stream("x");

        assert_eq!(entry.value().as_text(), Some("hix"));
        assert_eq!(entry.rendered().text_content(), Some("hix"));
    }

    #[test]
    fn test_stream_into_composite_touches_only_last_text_leaf() {
        let tree = Renderable::column(vec![
            Renderable::text("intro"),
            Renderable::text("tail"),
        ]);
        let mut entry = ChatMessage::new(Value::Panel(tree));
        entry.stream("!");

        let panel = entry.rendered();
        assert_eq!(panel.node_at(&[0]).unwrap().text_content(), Some("intro"));
        assert_eq!(panel.node_at(&[1]).unwrap().text_content(), Some("tail!"));

        // The value tree mirrors the cached panel
        let Value::Panel(value_tree) = entry.value() else {
            panic!("value should still be a composite");
        };
        assert_eq!(value_tree.node_at(&[1]).unwrap().text_content(), Some("tail!"));
    }

    #[test]
    fn test_stream_without_text_leaf_is_a_noop() {
        let value = Value::File(FileInput::new(
            Bytes::from_static(b"a,b\n1,2"),
            "t.csv",
            "text/csv",
        ));
        let mut entry = ChatMessage::new(value);
        assert!(matches!(entry.rendered(), Renderable::Table { .. }));
        entry.stream("x"); // no text leaf anywhere; token dropped
        assert!(matches!(entry.rendered(), Renderable::Table { .. }));
    }

    #[test]
    fn test_value_replacement_rebuilds_cached_panel() {
        let mut entry = ChatMessage::new("first");
        assert_eq!(entry.rendered().text_content(), Some("first"));

        entry.set_value("second");
        assert_eq!(entry.rendered().text_content(), Some("second"));
    }

    #[test]
    fn test_update_with_bare_value() {
        let mut entry = ChatMessage::new("old").with_user("Ada");
        entry.update("new", None, None).unwrap();
        assert_eq!(entry.value().as_text(), Some("new"));
        assert_eq!(entry.user(), "Ada"); // untouched
    }

    #[test]
    fn test_update_with_field_patch_and_overrides() {
        let mut entry = ChatMessage::new("old");
        let patch = FieldPatch {
            value: Some(Value::Text("patched".into())),
            user: Some("Grace".into()),
            ..FieldPatch::default()
        };
        entry.update(patch, Some("Ada"), Some("🔬")).unwrap();

        assert_eq!(entry.value().as_text(), Some("patched"));
        assert_eq!(entry.user(), "Ada"); // explicit arg wins over patch
        assert_eq!(entry.avatar(), "🔬");
    }

    #[test]
    fn test_update_from_entry_copies_full_state() {
        let source = ChatMessage::new("copied body")
            .with_user("Assistant")
            .with_reactions(vec!["favorite".into()]);
        let mut entry = ChatMessage::new("original");

        entry.update(source, None, None).unwrap();
        assert_eq!(entry.value().as_text(), Some("copied body"));
        assert_eq!(entry.user(), "Assistant");
        assert_eq!(entry.reactions(), ["favorite"]);
        assert_eq!(entry.avatar(), "🤖");
    }

    #[test]
    fn test_update_from_entry_rejects_overrides() {
        let source = ChatMessage::new("x");
        let mut entry = ChatMessage::new("y");
        assert_eq!(
            entry.update(source, Some("Ada"), None),
            Err(WidgetError::ConflictingOverride)
        );
    }

    #[test]
    fn test_avatar_defaults_follow_user() {
        let entry = ChatMessage::new("hello").with_user("Assistant");
        assert_eq!(entry.avatar(), "🤖");

        let entry = ChatMessage::new("hello").with_user("Dr. Ada!");
        assert_eq!(entry.avatar(), "D"); // table miss, first character
    }

    #[test]
    fn test_explicit_avatar_wins_over_lookup() {
        let mut entry = ChatMessage::new("hello")
            .with_user("Assistant")
            .with_avatar("😊");
        assert_eq!(entry.avatar(), "😊");

        // User changes do not displace an explicit avatar
        entry.set_user("System");
        assert_eq!(entry.avatar(), "😊");

        // Clearing it re-resolves from the new user
        entry.set_avatar(None);
        assert_eq!(entry.avatar(), "⚙️");
    }

    #[test]
    fn test_avatar_lookup_function_overrides_table() {
        let entry = ChatMessage::new("hello")
            .with_user("Assistant")
            .with_avatar_lookup(|user| format!("<{user}>"));
        assert_eq!(entry.avatar(), "<Assistant>");
    }

    #[test]
    fn test_copy_text_comes_from_cached_panel_only() {
        let entry = ChatMessage::new("copy me");
        assert_eq!(entry.copy_text(), Some("copy me".to_string()));

        // Tables have no text root, so nothing to copy
        let csv = Value::File(FileInput::new(
            Bytes::from_static(b"a,b\n1,2"),
            "t.csv",
            "text/csv",
        ));
        let entry = ChatMessage::new(csv);
        assert_eq!(entry.copy_text(), None);

        let mut entry = ChatMessage::new("hidden");
        entry.show_copy_icon = false;
        assert_eq!(entry.copy_text(), None);
    }

    #[test]
    fn test_reaction_toggle_and_glyphs() {
        let mut entry = ChatMessage::new("hello");
        entry.toggle_reaction("favorite");
        assert_eq!(entry.reaction_glyphs(), vec!["♥"]);

        entry.toggle_reaction("rocket"); // no icon configured
        assert_eq!(entry.reaction_glyphs(), vec!["♥", "rocket"]);

        entry.toggle_reaction("favorite");
        assert_eq!(entry.reaction_glyphs(), vec!["rocket"]);
    }

    #[test]
    fn test_temp_files_removed_at_teardown() {
        let audio = Value::File(FileInput::new(
            Bytes::from_static(b"ID3clip"),
            "clip.mp3",
            "audio/mpeg",
        ));
        let entry = ChatMessage::new(audio);
        let Renderable::Audio { path, .. } = entry.rendered().clone() else {
            panic!("expected audio rendering");
        };
        assert!(path.exists());

        drop(entry);
        assert!(!path.exists(), "backing file should be removed on teardown");
    }

    #[test]
    fn test_watchers_see_value_changes() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let mut entry = ChatMessage::new("hello");
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        entry.watchers_mut().watch(ChatField::Value, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        entry.set_value("changed");
        entry.stream("!");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
