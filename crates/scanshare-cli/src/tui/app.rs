//! Application state and logic

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use scanshare_core::share::{qr_file_name, share_with_fallback, Clipboard, NoShareSheet};
use scanshare_core::{
    Direction, Editor, ItemField, ItemId, ItemKind, ListDocument, ListItem, SharePayload,
    SharedList,
};

/// How long status messages stay visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Images can't be edited in place
const IMAGE_CONTENT_HINT: &str = "Images can't be edited; delete it (d) and add a new one (i)";

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Command input mode (after pressing : or a command key)
    Command,
}

/// Type of command being entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    /// Generic command starting with :
    Generic,
    /// Edit the list title
    Title,
    /// Edit the list description
    Description,
    /// Add a text item
    AddText,
    /// Add an image item from a file
    AddImage,
    /// Edit the selected item's title
    ItemTitle,
    /// Edit the selected text item's body
    Content,
    /// Edit the selected image's caption
    Caption,
}

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Items,
    Preview,
}

impl ActivePane {
    pub fn toggle(self) -> Self {
        match self {
            ActivePane::Items => ActivePane::Preview,
            ActivePane::Preview => ActivePane::Items,
        }
    }
}

/// Result of command execution
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Command completed
    Done,
    /// Need the external editor for a text item's body
    NeedEditor(ItemId),
    /// Need to download the QR image
    NeedDownload { url: String, path: PathBuf },
}

/// Application state
pub struct App {
    /// The editing session
    pub editor: Editor,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Type of command being entered
    pub command_type: Option<CommandType>,
    /// Command input buffer
    pub command_input: String,
    /// Cursor position in command input (in chars)
    pub command_cursor: usize,
    /// Which pane has focus
    pub active_pane: ActivePane,
    /// Currently selected item index
    pub selected: usize,
    /// Scroll offset for the preview pane
    pub preview_scroll: u16,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Error shown in a modal until dismissed
    pub error_message: Option<String>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Whether a blocking operation (QR download) is running
    pub is_loading: bool,
    /// Most recent share of this session
    pub last_share: Option<SharedList>,
    /// Document as it was when `last_share` was minted
    shared_snapshot: Option<Arc<ListDocument>>,
}

impl App {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            should_quit: false,
            input_mode: InputMode::Normal,
            command_type: None,
            command_input: String::new(),
            command_cursor: 0,
            active_pane: ActivePane::Items,
            selected: 0,
            preview_scroll: 0,
            status_message: None,
            status_message_time: None,
            error_message: None,
            show_help: false,
            is_loading: false,
            last_share: None,
            shared_snapshot: None,
        }
    }

    /// End the session, returning the number of discarded imports
    pub fn close(self) -> usize {
        self.editor.close()
    }

    // ==================== Messages ====================

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ==================== Selection ====================

    pub fn items(&self) -> &[ListItem] {
        &self.editor.current().items
    }

    /// Get the currently selected item
    pub fn current_item(&self) -> Option<&ListItem> {
        self.items().get(self.selected)
    }

    fn current_id(&self) -> Option<ItemId> {
        self.current_item().map(|item| item.id.clone())
    }

    /// Move selection (or scroll the preview) up
    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Items => self.selected = self.selected.saturating_sub(1),
            ActivePane::Preview => self.preview_scroll = self.preview_scroll.saturating_sub(1),
        }
    }

    /// Move selection (or scroll the preview) down
    pub fn move_down(&mut self) {
        match self.active_pane {
            ActivePane::Items => {
                if self.selected + 1 < self.items().len() {
                    self.selected += 1;
                }
            }
            ActivePane::Preview => self.preview_scroll = self.preview_scroll.saturating_add(1),
        }
    }

    pub fn move_to_first(&mut self) {
        match self.active_pane {
            ActivePane::Items => self.selected = 0,
            ActivePane::Preview => self.preview_scroll = 0,
        }
    }

    pub fn move_to_last(&mut self) {
        if self.active_pane == ActivePane::Items {
            self.selected = self.items().len().saturating_sub(1);
        }
    }

    pub fn next_pane(&mut self) {
        self.active_pane = self.active_pane.toggle();
    }

    /// Keep the selection inside the list
    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.items().len().saturating_sub(1));
    }

    // ==================== Item Operations ====================

    /// Move the selected item, keeping it selected
    pub fn move_current(&mut self, direction: Direction) {
        let Some(id) = self.current_id() else {
            return;
        };
        if self.editor.move_item(&id, direction) {
            self.selected = match direction {
                Direction::Up => self.selected - 1,
                Direction::Down => self.selected + 1,
            };
        }
    }

    /// Delete the selected item
    pub fn delete_current(&mut self) {
        let Some(id) = self.current_id() else {
            self.set_status("No item selected");
            return;
        };
        if let Some(item) = self.editor.delete_item(&id) {
            self.set_status(format!("Deleted '{}'", item_label(&item)));
            self.clamp_selection();
        }
    }

    /// Append a text item and select it
    pub fn add_text(&mut self, body: &str) {
        let id = self.editor.add_item(ItemKind::Text);
        self.editor.update_item(&id, ItemField::Content, body);
        self.select(&id);
    }

    fn select(&mut self, id: &ItemId) {
        if let Some(index) = self.editor.current().position(id) {
            self.selected = index;
        }
    }

    /// Start importing an image file
    pub fn add_image(&mut self, path: &str) {
        let path = expand_home(path.trim());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.editor.import_image(path);
        self.set_status(format!("Importing '{}'...", name));
    }

    /// Collect finished image imports
    pub fn collect_imports(&mut self) {
        for result in self.editor.poll_imports() {
            match result {
                Ok(id) => {
                    self.select(&id);
                    let label = self.current_item().map(item_label).unwrap_or_default();
                    self.set_status(format!("Added image '{}'", label));
                }
                Err(e) => self.set_error(format!("Image import failed: {}", e)),
            }
        }
    }

    /// The selected item, if it can be edited in $EDITOR
    pub fn external_edit_target(&mut self) -> Option<ItemId> {
        let target = self.current_item().map(|item| (item.id.clone(), item.kind()));
        match target {
            Some((id, ItemKind::Text)) => Some(id),
            Some(_) => {
                self.set_status("Only text items open in the editor");
                None
            }
            None => {
                self.set_status("No item selected");
                None
            }
        }
    }

    /// Set a field on the selected item
    pub fn update_current(&mut self, field: ItemField, value: &str) {
        let Some((id, kind)) = self.current_item().map(|item| (item.id.clone(), item.kind()))
        else {
            self.set_status("No item selected");
            return;
        };
        match (field, kind) {
            (ItemField::Description, ItemKind::Text) => {
                self.set_status("Captions apply to image items only");
                return;
            }
            (ItemField::Content, ItemKind::Image) => {
                self.set_status(IMAGE_CONTENT_HINT);
                return;
            }
            _ => {}
        }
        self.editor.update_item(&id, field, value);
    }

    // ==================== Sharing ====================

    /// Store a snapshot and remember its links
    pub fn share(&mut self) -> anyhow::Result<&SharedList> {
        let snapshot = self.editor.document();
        let shared = self.editor.request_share_link()?;
        self.set_status(format!("Shared: {}", shared.url));
        self.shared_snapshot = Some(snapshot);
        Ok(self.last_share.insert(shared))
    }

    /// Whether the list changed after the latest share
    pub fn share_is_stale(&self) -> bool {
        match &self.shared_snapshot {
            Some(snapshot) => !Arc::ptr_eq(snapshot, &self.editor.document()),
            None => self.last_share.is_some(),
        }
    }

    /// Share, then hand the link to the share sheet or clipboard
    pub fn copy_link(&mut self, clipboard: &dyn Clipboard) -> anyhow::Result<()> {
        let url = self.share()?.url.clone();
        let payload = SharePayload::for_editor(self.editor.current(), url);

        match share_with_fallback(&NoShareSheet, clipboard, &payload) {
            Ok(outcome) => self.set_status(outcome.message()),
            Err(e) => self.set_error(e.to_string()),
        }
        Ok(())
    }

    /// Link of the latest share, sharing again if the list changed since
    pub fn latest_link(&mut self) -> anyhow::Result<SharedList> {
        if !self.share_is_stale() {
            if let Some(shared) = &self.last_share {
                return Ok(shared.clone());
            }
        }
        Ok(self.share()?.clone())
    }

    // ==================== Command Input ====================

    /// Enter command mode with a specific command type
    pub fn enter_command_mode(&mut self, cmd_type: CommandType) {
        let prefill = match cmd_type {
            CommandType::Generic => String::new(),
            CommandType::Title => format!("title {}", self.editor.current().title),
            CommandType::Description => format!("desc {}", self.editor.current().description),
            CommandType::AddText => "text ".to_string(),
            CommandType::AddImage => "image ".to_string(),
            CommandType::ItemTitle => {
                let Some(item) = self.current_item() else {
                    self.set_status("No item selected");
                    return;
                };
                format!("name {}", item.title.as_deref().unwrap_or(""))
            }
            CommandType::Content => {
                let Some(item) = self.current_item() else {
                    self.set_status("No item selected");
                    return;
                };
                if item.kind() != ItemKind::Text {
                    self.set_status(IMAGE_CONTENT_HINT);
                    return;
                }
                format!("edit {}", escape_newlines(item.content()))
            }
            CommandType::Caption => {
                let Some(item) = self.current_item() else {
                    self.set_status("No item selected");
                    return;
                };
                if item.kind() != ItemKind::Image {
                    self.set_status("Captions apply to image items only");
                    return;
                }
                format!("caption {}", item.description().unwrap_or(""))
            }
        };

        self.input_mode = InputMode::Command;
        self.command_type = Some(cmd_type);
        self.command_cursor = prefill.chars().count();
        self.command_input = prefill;
    }

    /// Exit command mode
    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command_type = None;
        self.command_input.clear();
        self.command_cursor = 0;
    }

    /// Byte offset of the cursor in the input buffer
    fn cursor_byte(&self) -> usize {
        self.command_input
            .char_indices()
            .nth(self.command_cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.command_input.len())
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, c: char) {
        let at = self.cursor_byte();
        self.command_input.insert(at, c);
        self.command_cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.command_cursor > 0 {
            self.command_cursor -= 1;
            let at = self.cursor_byte();
            self.command_input.remove(at);
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.command_cursor = self.command_cursor.saturating_sub(1);
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        if self.command_cursor < self.command_input.chars().count() {
            self.command_cursor += 1;
        }
    }

    /// Parse and execute command from input
    pub fn execute_command(&mut self) -> anyhow::Result<CommandResult> {
        let input = self.command_input.trim_start().to_string();
        let (command, arg) = input.split_once(' ').unwrap_or((input.as_str(), ""));

        match command {
            "title" => self.editor.set_title(arg.trim()),
            "desc" | "description" => self.editor.set_description(arg.trim()),
            "text" | "add" => self.add_text(&unescape_newlines(arg)),
            "image" | "img" => {
                if arg.trim().is_empty() {
                    self.set_status("Usage: image <path>");
                } else {
                    self.add_image(arg);
                }
            }
            "name" => self.update_current(ItemField::Title, arg.trim()),
            "edit" => {
                let is_text = self
                    .current_item()
                    .is_some_and(|item| item.kind() == ItemKind::Text);
                match self.current_id() {
                    Some(id) if arg.is_empty() && is_text => {
                        return Ok(CommandResult::NeedEditor(id));
                    }
                    _ => self.update_current(ItemField::Content, &unescape_newlines(arg)),
                }
            }
            "caption" => self.update_current(ItemField::Description, arg.trim()),
            "delete" | "d" => self.delete_current(),
            "share" => {
                self.share()?;
            }
            "qr" => {
                let shared = self.latest_link()?;
                let path = if arg.trim().is_empty() {
                    PathBuf::from(qr_file_name(&self.editor.current().title))
                } else {
                    expand_home(arg.trim())
                };
                return Ok(CommandResult::NeedDownload {
                    url: shared.qr_image_url,
                    path,
                });
            }
            "q" | "quit" => self.should_quit = true,
            "" => {}
            other => self.set_status(format!("Unknown command: {}", other)),
        }

        Ok(CommandResult::Done)
    }
}

/// Short label for an item in lists and messages
pub fn item_label(item: &ListItem) -> String {
    if let Some(title) = item.title.as_deref().filter(|t| !t.trim().is_empty()) {
        return title.to_string();
    }
    match item.kind() {
        ItemKind::Text => item
            .content()
            .lines()
            .find(|line| !line.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "(empty)".to_string()),
        ItemKind::Image => "Image".to_string(),
    }
}

/// Show newlines as `\n` in the one-line command input
fn escape_newlines(s: &str) -> String {
    s.replace('\n', "\\n")
}

fn unescape_newlines(s: &str) -> String {
    s.replace("\\n", "\n")
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanshare_core::config::DEFAULT_QR_SERVICE_URL;
    use scanshare_core::share::ShareError;
    use scanshare_core::{DocumentStore, MemoryStore, ShareLinks};
    use std::cell::RefCell;
    use std::sync::Arc;

    fn test_app() -> (Arc<MemoryStore>, App) {
        let store = Arc::new(MemoryStore::new());
        let links = ShareLinks::new("https://scanshare.app", DEFAULT_QR_SERVICE_URL, 300);
        (store.clone(), App::new(Editor::new(store, links)))
    }

    fn run(app: &mut App, command: &str) -> CommandResult {
        app.command_input = command.to_string();
        app.execute_command().unwrap()
    }

    fn contents(app: &App) -> Vec<String> {
        app.items().iter().map(|i| i.content().to_string()).collect()
    }

    #[test]
    fn test_active_pane_toggle() {
        assert_eq!(ActivePane::Items.toggle(), ActivePane::Preview);
        assert_eq!(ActivePane::Preview.toggle(), ActivePane::Items);
    }

    #[test]
    fn test_title_and_items() {
        let (_, mut app) = test_app();
        run(&mut app, "title Menu");
        run(&mut app, "desc Lunch specials");
        run(&mut app, "text Soup - $5");
        run(&mut app, "text Bread\\nButter");

        let doc = app.editor.current();
        assert_eq!(doc.title, "Menu");
        assert_eq!(doc.description, "Lunch specials");
        assert_eq!(contents(&app), vec!["Soup - $5", "Bread\nButter"]);
        // New items are selected
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_reorder_follows_selection() {
        let (_, mut app) = test_app();
        for text in ["A", "B", "C"] {
            app.add_text(text);
        }
        app.selected = 1;

        app.move_current(Direction::Up);
        assert_eq!(contents(&app), vec!["B", "A", "C"]);
        assert_eq!(app.selected, 0);

        // Already first
        app.move_current(Direction::Up);
        assert_eq!(contents(&app), vec!["B", "A", "C"]);
        assert_eq!(app.selected, 0);

        app.move_to_last();
        app.move_current(Direction::Down);
        assert_eq!(contents(&app), vec!["B", "A", "C"]);
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_delete_clamps_selection() {
        let (_, mut app) = test_app();
        app.add_text("A");
        app.add_text("B");
        assert_eq!(app.selected, 1);

        app.delete_current();
        assert_eq!(contents(&app), vec!["A"]);
        assert_eq!(app.selected, 0);
        assert_eq!(app.status_message.as_deref(), Some("Deleted 'B'"));

        app.delete_current();
        app.delete_current();
        assert!(app.items().is_empty());
        assert_eq!(app.status_message.as_deref(), Some("No item selected"));
    }

    #[test]
    fn test_item_fields() {
        let (_, mut app) = test_app();
        app.add_text("Soup");
        run(&mut app, "name Starter");
        run(&mut app, "edit Soup - $5");
        run(&mut app, "caption Hot");

        let item = app.current_item().unwrap();
        assert_eq!(item.title.as_deref(), Some("Starter"));
        assert_eq!(item.content(), "Soup - $5");
        assert_eq!(item.description(), None);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Captions apply to image items only")
        );

        run(&mut app, "name ");
        assert_eq!(app.current_item().unwrap().title, None);
    }

    #[test]
    fn test_bare_edit_opens_editor() {
        let (_, mut app) = test_app();
        app.add_text("Soup");
        let id = app.current_item().unwrap().id.clone();
        assert_eq!(run(&mut app, "edit"), CommandResult::NeedEditor(id));
    }

    #[test]
    fn test_external_edit_target() {
        let (_, mut app) = test_app();
        assert_eq!(app.external_edit_target(), None);

        app.add_text("Soup");
        let id = app.current_item().unwrap().id.clone();
        assert_eq!(app.external_edit_target(), Some(id));

        let image = app.editor.add_item(ItemKind::Image);
        app.select(&image);
        assert_eq!(app.external_edit_target(), None);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Only text items open in the editor")
        );
    }

    #[test]
    fn test_prefill() {
        let (_, mut app) = test_app();
        app.editor.set_title("Menu");
        app.enter_command_mode(CommandType::Title);
        assert_eq!(app.command_input, "title Menu");
        assert_eq!(app.command_cursor, 10);
        app.exit_input_mode();

        // No item yet
        app.enter_command_mode(CommandType::Caption);
        assert_eq!(app.input_mode, InputMode::Normal);

        app.add_text("a\nb");
        app.enter_command_mode(CommandType::Content);
        assert_eq!(app.command_input, "edit a\\nb");
    }

    #[test]
    fn test_input_editing_multibyte() {
        let (_, mut app) = test_app();
        app.enter_command_mode(CommandType::Generic);
        for c in "title Café".chars() {
            app.insert_char(c);
        }
        app.cursor_left();
        app.insert_char('!');
        assert_eq!(app.command_input, "title Caf!é");

        app.cursor_right();
        app.delete_char();
        assert_eq!(app.command_input, "title Caf!");
    }

    #[test]
    fn test_share_stores_snapshot() {
        let (store, mut app) = test_app();
        run(&mut app, "title Menu");
        run(&mut app, "text Soup - $5");
        run(&mut app, "share");

        let shared = app.last_share.clone().unwrap();
        assert_eq!(
            app.status_message.as_deref(),
            Some(format!("Shared: {}", shared.url).as_str())
        );
        let stored = store.get(&shared.id).unwrap().unwrap();
        assert_eq!(stored.items[0].content(), "Soup - $5");

        run(&mut app, "share");
        assert_ne!(app.last_share.as_ref().unwrap().id, shared.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_qr_command() {
        let (store, mut app) = test_app();
        run(&mut app, "title Menu");

        match run(&mut app, "qr") {
            CommandResult::NeedDownload { url, path } => {
                assert!(url.contains("size=300x300"));
                assert_eq!(path, PathBuf::from("Menu-qr-code.png"));
            }
            other => panic!("unexpected {:?}", other),
        }
        // Reuses the existing share
        run(&mut app, "qr");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_qr_after_edit_shares_again() {
        let (store, mut app) = test_app();
        run(&mut app, "title Menu");
        let first = app.latest_link().unwrap();
        assert!(!app.share_is_stale());

        run(&mut app, "text Soup - $5");
        assert!(app.share_is_stale());

        let second = match run(&mut app, "qr") {
            CommandResult::NeedDownload { url, .. } => url,
            other => panic!("unexpected {:?}", other),
        };
        assert_ne!(second, first.qr_image_url);
        assert_eq!(store.len(), 2);
        assert!(!app.share_is_stale());

        let latest = app.last_share.clone().unwrap();
        let stored = store.get(&latest.id).unwrap().unwrap();
        assert_eq!(stored.items[0].content(), "Soup - $5");

        // No-op edits keep the link
        app.editor
            .update_item(&ItemId::from("missing"), ItemField::Content, "x");
        app.latest_link().unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_edit_refuses_image_content() {
        let (_, mut app) = test_app();
        let id = app.editor.add_item(ItemKind::Image);
        app.editor
            .update_item(&id, ItemField::Content, "data:image/png;base64,AA==");
        app.select(&id);

        assert_eq!(run(&mut app, "edit"), CommandResult::Done);
        assert_eq!(app.current_item().unwrap().content(), "data:image/png;base64,AA==");
        assert_eq!(app.status_message.as_deref(), Some(IMAGE_CONTENT_HINT));

        run(&mut app, "edit hello");
        assert_eq!(app.current_item().unwrap().content(), "data:image/png;base64,AA==");

        app.status_message = None;
        app.enter_command_mode(CommandType::Content);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some(IMAGE_CONTENT_HINT));
    }

    #[derive(Default)]
    struct FakeClipboard {
        fail: bool,
        copied: RefCell<Vec<String>>,
    }

    impl Clipboard for FakeClipboard {
        fn copy(&self, text: &str) -> Result<(), ShareError> {
            if self.fail {
                return Err(ShareError::Clipboard("denied".to_string()));
            }
            self.copied.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_link() {
        let (_, mut app) = test_app();
        let clipboard = FakeClipboard::default();

        app.copy_link(&clipboard).unwrap();

        let url = app.last_share.as_ref().unwrap().url.clone();
        assert_eq!(*clipboard.copied.borrow(), vec![url]);
        assert_eq!(app.status_message.as_deref(), Some("Link copied to clipboard"));
    }

    #[test]
    fn test_copy_link_failure_shows_error() {
        let (_, mut app) = test_app();
        let clipboard = FakeClipboard {
            fail: true,
            ..Default::default()
        };

        app.copy_link(&clipboard).unwrap();
        assert!(app.has_error());
        assert!(app.last_share.is_some());
    }

    #[tokio::test]
    async fn test_image_import_selects_item() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("front.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n0000").unwrap();

        let (_, mut app) = test_app();
        app.add_text("Soup");
        run(&mut app, &format!("image {}", path.display()));
        assert_eq!(app.items().len(), 1);

        let results = app.editor.settle_imports().await;
        assert_eq!(results.len(), 1);
        let id = results.into_iter().next().unwrap().unwrap();
        app.select(&id);

        assert_eq!(app.selected, 1);
        assert_eq!(item_label(app.current_item().unwrap()), "front.png");
    }

    #[tokio::test]
    async fn test_failed_import_shows_error() {
        let (_, mut app) = test_app();
        app.add_image("/definitely/missing.png");

        while app.editor.pending_imports() > 0 {
            tokio::task::yield_now().await;
            app.collect_imports();
        }

        assert!(app.has_error());
        assert!(app.items().is_empty());
    }

    #[test]
    fn test_item_label() {
        let mut item = ListItem::text("\n  \nSoup\nBread");
        assert_eq!(item_label(&item), "Soup");
        item.set_field(ItemField::Title, "Starter");
        assert_eq!(item_label(&item), "Starter");
        assert_eq!(item_label(&ListItem::text("")), "(empty)");
        assert_eq!(item_label(&ListItem::image("data:,", None)), "Image");
    }

    #[test]
    fn test_unknown_command() {
        let (_, mut app) = test_app();
        run(&mut app, "sync");
        assert_eq!(app.status_message.as_deref(), Some("Unknown command: sync"));
    }
}
