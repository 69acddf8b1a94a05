//! The toolbar model: which buttons exist and which are active.

use inkpad_doc::{BlockKind, Mark};

use crate::command::Command;
use crate::session::Session;

/// A toolbar button.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarButton {
    pub command: Command,
    pub icon: &'static str,
    pub label: String,
    pub active: bool,
}

/// Marks with a toolbar button, in display order.
pub const MARK_BUTTONS: [Mark; 4] = [Mark::Bold, Mark::Italic, Mark::Underlined, Mark::Code];

/// Block kinds with a toolbar button, in display order.
pub const BLOCK_BUTTONS: [BlockKind; 5] = [
    BlockKind::HeadingOne,
    BlockKind::HeadingTwo,
    BlockKind::BlockQuote,
    BlockKind::NumberedList,
    BlockKind::BulletedList,
];

fn button(command: Command, active: bool) -> ToolbarButton {
    ToolbarButton {
        icon: command.icon().unwrap_or("help"),
        label: command.display_name(),
        command,
        active,
    }
}

/// Builds the formatting and image buttons for the current session state.
pub fn buttons(session: &Session) -> Vec<ToolbarButton> {
    let marks = MARK_BUTTONS
        .into_iter()
        .map(|mark| button(Command::ToggleMark(mark.clone()), session.has_mark(&mark)));
    let blocks = BLOCK_BUTTONS.into_iter().map(|kind| {
        let active = session.is_block_active(&kind);
        button(Command::ToggleBlock(kind), active)
    });
    let images = [Command::PromptImage, Command::BrowseImage]
        .into_iter()
        .map(|command| button(command, false));

    marks.chain(blocks).chain(images).collect()
}

/// The save and cancel buttons.
pub fn session_buttons(session: &Session) -> [ToolbarButton; 2] {
    [
        button(Command::Save, session.modified()),
        button(Command::Cancel, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;

    #[test]
    fn test_buttons_reflect_selection() {
        let mut config = Config::default();
        config.gate.ceiling = 10;
        let mut session = Session::open(Box::new(MemoryStore::new()), &config);

        let all = buttons(&session);
        assert_eq!(all.len(), 11);
        assert_eq!(all[0].icon, "format_bold");
        assert!(all.iter().all(|b| !b.active));

        session.execute(Command::ToggleMark(Mark::Italic));
        session.execute(Command::ToggleBlock(BlockKind::HeadingTwo));
        let active: Vec<_> = buttons(&session)
            .into_iter()
            .filter(|b| b.active)
            .map(|b| b.command)
            .collect();
        assert_eq!(
            active,
            vec![
                Command::ToggleMark(Mark::Italic),
                Command::ToggleBlock(BlockKind::HeadingTwo)
            ]
        );
        assert!(session_buttons(&session)[0].active);
    }
}
