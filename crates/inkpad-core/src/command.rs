//! Command system for editor actions.
//!
//! ## Learning: The Command Pattern
//!
//! Commands encapsulate actions as values:
//! - Toolbar buttons, hotkeys and the UI all produce the same `Command`
//! - The session decides how each one runs (through the gate or not)
//! - Tests can drive the editor without a UI

use inkpad_doc::{BlockKind, DocResult, EditKind, Mark, Value};

/// Editor commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    // Formatting
    ToggleMark(Mark),
    ToggleBlock(BlockKind),

    // Images
    InsertImage { src: String },
    /// Ask the user for an image URL
    PromptImage,
    /// Pick image files from disk
    BrowseImage,

    // Session
    SetCeiling(String),
    Save,
    Cancel,
    Undo,
    Redo,

    // Typing
    InsertText(String),
    SplitBlock,
    DeleteBackward,
    MoveLeft,
    MoveRight,
}

impl Command {
    /// Returns the command's display name.
    pub fn display_name(&self) -> String {
        match self {
            Command::ToggleMark(mark) => format!("Toggle {}", title_case(mark.as_str())),
            Command::ToggleBlock(kind) => format!("Toggle {}", title_case(kind.as_str())),
            Command::InsertImage { .. } => "Insert Image".to_string(),
            Command::PromptImage => "Image from URL".to_string(),
            Command::BrowseImage => "Image from File".to_string(),
            Command::SetCeiling(_) => "Set Node Ceiling".to_string(),
            Command::Save => "Save".to_string(),
            Command::Cancel => "Cancel".to_string(),
            Command::Undo => "Undo".to_string(),
            Command::Redo => "Redo".to_string(),
            Command::InsertText(_) => "Insert Text".to_string(),
            Command::SplitBlock => "Split Block".to_string(),
            Command::DeleteBackward => "Delete Backward".to_string(),
            Command::MoveLeft => "Move Left".to_string(),
            Command::MoveRight => "Move Right".to_string(),
        }
    }

    /// Material icon name for toolbar commands.
    pub fn icon(&self) -> Option<&'static str> {
        let icon = match self {
            Command::ToggleMark(Mark::Bold) => "format_bold",
            Command::ToggleMark(Mark::Italic) => "format_italic",
            Command::ToggleMark(Mark::Underlined) => "format_underlined",
            Command::ToggleMark(Mark::Code) => "code",
            Command::ToggleBlock(BlockKind::HeadingOne) => "looks_one",
            Command::ToggleBlock(BlockKind::HeadingTwo) => "looks_two",
            Command::ToggleBlock(BlockKind::BlockQuote) => "format_quote",
            Command::ToggleBlock(BlockKind::NumberedList) => "format_list_numbered",
            Command::ToggleBlock(BlockKind::BulletedList) => "format_list_bulleted",
            Command::PromptImage => "image",
            Command::BrowseImage => "folder_open",
            Command::Save => "save",
            Command::Cancel => "cancel",
            _ => return None,
        };
        Some(icon)
    }

    /// Parses a command name as used in key binding config.
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(mark) = name.strip_prefix("mark.") {
            return Some(Command::ToggleMark(Mark::parse(mark)));
        }
        if let Some(kind) = name.strip_prefix("block.") {
            return Some(Command::ToggleBlock(BlockKind::parse(kind)));
        }
        match name {
            "image.prompt" => Some(Command::PromptImage),
            "image.browse" => Some(Command::BrowseImage),
            "document.save" => Some(Command::Save),
            "document.cancel" => Some(Command::Cancel),
            "history.undo" => Some(Command::Undo),
            "history.redo" => Some(Command::Redo),
            _ => None,
        }
    }

    /// The history kind for commands that edit the value, or `None` for
    /// commands the session handles itself.
    pub fn edit_kind(&self) -> Option<EditKind> {
        match self {
            Command::InsertText(_) => Some(EditKind::Typing),
            Command::ToggleMark(_)
            | Command::ToggleBlock(_)
            | Command::InsertImage { .. }
            | Command::SplitBlock
            | Command::DeleteBackward
            | Command::MoveLeft
            | Command::MoveRight => Some(EditKind::Other),
            Command::PromptImage
            | Command::BrowseImage
            | Command::SetCeiling(_)
            | Command::Save
            | Command::Cancel
            | Command::Undo
            | Command::Redo => None,
        }
    }

    /// Applies an editing command to a value. Other commands leave it as is.
    pub fn apply(&self, value: &mut Value) -> DocResult<()> {
        match self {
            Command::ToggleMark(mark) => value.toggle_mark(mark.clone()),
            Command::ToggleBlock(kind) => toggle_block(value, kind),
            Command::InsertImage { src } => value.insert_image(src.as_str(), None),
            Command::InsertText(text) => value.insert_text(text),
            Command::SplitBlock => value.split_block(),
            Command::DeleteBackward => value.delete_backward(),
            Command::MoveLeft => value.move_left(),
            Command::MoveRight => value.move_right(),
            Command::PromptImage
            | Command::BrowseImage
            | Command::SetCeiling(_)
            | Command::Save
            | Command::Cancel
            | Command::Undo
            | Command::Redo => Ok(()),
        }
    }
}

fn title_case(tag: &str) -> String {
    tag.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns true if the block button for `kind` should show as active.
///
/// A list button is active only when a list item is selected and the first
/// selected block sits directly in a list of that kind.
pub fn is_block_active(value: &Value, kind: &BlockKind) -> bool {
    if kind.is_list() {
        if value.selected_blocks().is_empty() {
            return value.has_block(kind);
        }
        return value.has_block(&BlockKind::ListItem)
            && value.first_block_parent_kind() == Some(kind);
    }
    value.has_block(kind)
}

/// Toggles a block kind on the selected blocks.
///
/// Plain kinds switch between `kind` and paragraph, leaving any list the
/// blocks were in. List kinds wrap the blocks in a list, switch them to the
/// other list kind, or unwrap them back to paragraphs.
pub fn toggle_block(value: &mut Value, kind: &BlockKind) -> DocResult<()> {
    let in_list = value.has_block(&BlockKind::ListItem);

    let Some(other_list) = kind.other_list() else {
        let target = if value.has_block(kind) {
            BlockKind::Paragraph
        } else {
            kind.clone()
        };
        value.set_blocks(target)?;
        if in_list {
            value.unwrap_block(BlockKind::BulletedList)?;
            value.unwrap_block(BlockKind::NumberedList)?;
        }
        return Ok(());
    };

    if in_list && value.is_inside(kind) {
        value.set_blocks(BlockKind::Paragraph)?;
        value.unwrap_block(BlockKind::BulletedList)?;
        value.unwrap_block(BlockKind::NumberedList)
    } else if in_list {
        value.unwrap_block(other_list)?;
        value.wrap_block(kind.clone())
    } else {
        value.set_blocks(BlockKind::ListItem)?;
        value.wrap_block(kind.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_doc::{Document, Node, Point, Selection};

    fn value(texts: &[&str]) -> Value {
        let mut value = Value::new(Document::new(
            texts.iter().map(|text| Node::paragraph(*text)).collect(),
        ));
        value.normalize();
        value
    }

    fn select_all(value: &mut Value, last: usize) {
        value
            .select(Selection::new(Point::ZERO, Point::new(last, 1)))
            .unwrap();
    }

    #[test]
    fn test_command_display_name() {
        assert_eq!(Command::Save.display_name(), "Save");
        assert_eq!(
            Command::ToggleBlock(BlockKind::HeadingOne).display_name(),
            "Toggle Heading One"
        );
    }

    #[test]
    fn test_parse_binding_names() {
        assert_eq!(Command::parse("mark.code"), Some(Command::ToggleMark(Mark::Code)));
        assert_eq!(
            Command::parse("block.block-quote"),
            Some(Command::ToggleBlock(BlockKind::BlockQuote))
        );
        assert_eq!(Command::parse("history.redo"), Some(Command::Redo));
        assert_eq!(Command::parse("editor.quit"), None);
    }

    #[test]
    fn test_toggle_heading_on_and_off() {
        let mut value = value(&["title"]);
        toggle_block(&mut value, &BlockKind::HeadingOne).unwrap();
        assert!(is_block_active(&value, &BlockKind::HeadingOne));

        toggle_block(&mut value, &BlockKind::HeadingOne).unwrap();
        assert!(value.has_block(&BlockKind::Paragraph));
    }

    #[test]
    fn test_toggle_list_on_switch_and_off() {
        let mut value = value(&["a", "b"]);
        let before = value.document().clone();
        select_all(&mut value, 1);

        toggle_block(&mut value, &BlockKind::BulletedList).unwrap();
        value.normalize();
        assert!(is_block_active(&value, &BlockKind::BulletedList));
        assert!(!is_block_active(&value, &BlockKind::NumberedList));

        toggle_block(&mut value, &BlockKind::NumberedList).unwrap();
        value.normalize();
        assert!(is_block_active(&value, &BlockKind::NumberedList));
        assert!(!value.is_inside(&BlockKind::BulletedList));

        toggle_block(&mut value, &BlockKind::NumberedList).unwrap();
        value.normalize();
        // The paragraph appended after the list stays behind
        assert_eq!(value.document().nodes[..2], before.nodes[..]);
        assert_eq!(value.document().nodes[2], Node::paragraph(""));
    }

    #[test]
    fn test_heading_inside_list_leaves_list() {
        let mut value = value(&["item"]);
        toggle_block(&mut value, &BlockKind::BulletedList).unwrap();
        value.normalize();

        toggle_block(&mut value, &BlockKind::HeadingTwo).unwrap();
        value.normalize();
        assert!(!value.is_inside(&BlockKind::BulletedList));
        assert_eq!(value.document().nodes[0].block_kind(), Some(&BlockKind::HeadingTwo));
    }

    #[test]
    fn test_icons() {
        assert_eq!(Command::ToggleMark(Mark::Bold).icon(), Some("format_bold"));
        assert_eq!(
            Command::ToggleBlock(BlockKind::BulletedList).icon(),
            Some("format_list_bulleted")
        );
        assert_eq!(Command::SplitBlock.icon(), None);
    }
}
