use iced::widget::text_input;
use iced::{Task, keyboard};
use std::path::PathBuf;

use inkpad_core::image::{self, Intake, Transfer};
use inkpad_core::{ChangeOutcome, Command, Key, KeyPress, Modifiers, SessionEvent};
use inkpad_doc::{Point, Selection};

use super::{App, Message};

const MIN_FONT_SIZE: f32 = 8.0;
const MAX_FONT_SIZE: f32 = 48.0;

/// Id of the URL prompt's text input.
pub fn url_input_id() -> text_input::Id {
    text_input::Id::new("image-url-prompt")
}

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = self.handle(message);
        self.drain_events();
        self.refresh_images();
        task
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Command(command) => return self.run_command(command),

            Message::KeyPressed(key, modifiers) => {
                return self.handle_key_pressed(key, modifiers);
            }

            Message::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers;
            }

            Message::Paste => return self.paste_from_clipboard(),

            Message::CeilingInputChanged(input) => {
                if self.session.set_ceiling_input(&input).is_none() {
                    self.status_message = format!("\"{}\" is not a node count", input);
                }
            }

            Message::UrlPromptChanged(input) => {
                if let Some(prompt) = &mut self.url_prompt {
                    *prompt = input;
                }
            }

            Message::UrlPromptSubmit => {
                let input = self.url_prompt.take();
                let outcome = self.session.submit_image_url(input.as_deref());
                self.report(outcome);
            }

            Message::UrlPromptCancel => {
                self.url_prompt = None;
            }

            Message::FilesPicked(paths) => {
                let files = match image::classify(
                    Transfer::Files(paths),
                    &self.session.image_config().extensions,
                ) {
                    Intake::ReadFiles(files) => files,
                    _ => Vec::new(),
                };
                return self.load_images(files, None);
            }

            Message::FileDropped(path) => {
                let target = self.drop_target();
                let (outcome, files) = self
                    .session
                    .drop_transfer(Transfer::Files(vec![path]), target);
                self.report(outcome);
                return self.load_images(files, target);
            }

            Message::ImageLoaded {
                name,
                target,
                result,
            } => match result {
                Ok(src) => {
                    let outcome = self.session.insert_image(src, target);
                    if outcome.is_applied() {
                        self.status_message = format!("Inserted {}", name);
                    }
                }
                Err(reason) => self.session.skip_image(name, reason),
            },

            Message::BlockClicked(ordinal) => {
                let Ok(len) = self.session.value().leaf_len(ordinal) else {
                    return Task::none();
                };
                let point = Point::new(ordinal, len);
                let selection = if self.modifiers.shift() {
                    let mut selection = self.session.value().selection();
                    selection.extend_to(point);
                    selection
                } else {
                    Selection::collapsed(point)
                };
                self.session.select(selection);
            }

            Message::BlockHovered(ordinal) => {
                self.hovered_block = Some(ordinal);
            }

            Message::BlockExited(ordinal) => {
                if self.hovered_block == Some(ordinal) {
                    self.hovered_block = None;
                }
            }

            Message::ZoomIn => {
                self.theme.font.size = (self.theme.font.size + 1.0).min(MAX_FONT_SIZE);
            }

            Message::ZoomOut => {
                self.theme.font.size = (self.theme.font.size - 1.0).max(MIN_FONT_SIZE);
            }

            Message::ZoomReset => {
                self.theme.font.size = self.base_font_size;
            }
        }

        Task::none()
    }

    fn run_command(&mut self, command: Command) -> Task<Message> {
        match command {
            Command::PromptImage => {
                self.url_prompt = Some(String::new());
                text_input::focus(url_input_id())
            }
            Command::BrowseImage => self.browse_images(),
            command => {
                let outcome = self.session.execute(command);
                self.report(outcome);
                Task::none()
            }
        }
    }

    fn report(&self, outcome: ChangeOutcome) {
        if let ChangeOutcome::Rejected { proposed, ceiling } = outcome {
            tracing::debug!("Change turned away: {} nodes over ceiling {}", proposed, ceiling);
        }
    }

    /// Turns queued session events into status bar text.
    fn drain_events(&mut self) {
        while let Some(event) = self.events.try_next() {
            match event {
                SessionEvent::CeilingChanged(ceiling) => {
                    self.status_message = format!("Node ceiling set to {}", ceiling);
                }
                SessionEvent::Saved => {
                    self.status_message = "Saved".to_string();
                }
                SessionEvent::SaveFailed(reason) => {
                    self.status_message = format!("Save failed: {}", reason);
                }
                SessionEvent::Cancelled => {
                    self.status_message = "Restored the last saved document".to_string();
                }
                SessionEvent::ImageSkipped { name, reason } => {
                    self.status_message = format!("Skipped {}: {}", name, reason);
                }
                // Rejections stay silent; the node counter shows the ceiling
                SessionEvent::Changed
                | SessionEvent::Rejected { .. }
                | SessionEvent::HistoryMoved => {}
            }
        }
    }

    /// The hovered block, else the current selection.
    fn drop_target(&self) -> Option<Selection> {
        match self.hovered_block {
            Some(ordinal) => {
                let len = self.session.value().leaf_len(ordinal).ok()?;
                Some(Selection::collapsed(Point::new(ordinal, len)))
            }
            None => Some(self.session.value().selection()),
        }
    }

    fn browse_images(&self) -> Task<Message> {
        let extensions = self.session.image_config().extensions.clone();
        Task::perform(
            async move {
                rfd::AsyncFileDialog::new()
                    .add_filter("Images", extensions.as_slice())
                    .pick_files()
                    .await
                    .map(|handles| {
                        handles
                            .iter()
                            .map(|handle| handle.path().to_path_buf())
                            .collect()
                    })
                    .unwrap_or_default()
            },
            Message::FilesPicked,
        )
    }

    /// Reads each file on its own task. Each result comes back as a
    /// separate `ImageLoaded` message.
    fn load_images(&self, files: Vec<PathBuf>, target: Option<Selection>) -> Task<Message> {
        let max_bytes = self.session.image_config().max_file_size_bytes();
        Task::batch(files.into_iter().map(|path| {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Task::perform(image::read_data_url(path, max_bytes), move |result| {
                Message::ImageLoaded {
                    name: name.clone(),
                    target,
                    result: result.map_err(|e| e.to_string()),
                }
            })
        }))
    }

    fn paste_from_clipboard(&mut self) -> Task<Message> {
        let text = match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Nothing to paste: {}", e);
                return Task::none();
            }
        };

        let (outcome, files) = self.session.paste(Transfer::Text(text));
        self.report(outcome);
        self.load_images(files, None)
    }

    pub fn handle_key_pressed(
        &mut self,
        key: keyboard::Key,
        modifiers: keyboard::Modifiers,
    ) -> Task<Message> {
        if self.url_prompt.is_some() {
            if key == keyboard::Key::Named(keyboard::key::Named::Escape) {
                return self.update(Message::UrlPromptCancel);
            }
            return Task::none();
        }

        let Some(press) = key_press(&key, modifiers) else {
            return Task::none();
        };

        if let Some(command) = self.keymap.process(&press) {
            return self.run_command(command);
        }

        if press.modifiers == Modifiers::MOD {
            match press.key {
                Key::Char('v') => return self.paste_from_clipboard(),
                Key::Char('=') | Key::Char('+') => return self.update(Message::ZoomIn),
                Key::Char('-') => return self.update(Message::ZoomOut),
                Key::Char('0') => return self.update(Message::ZoomReset),
                _ => {}
            }
        }

        if modifiers.control() || modifiers.logo() {
            return Task::none();
        }

        let command = match (&key, press.key) {
            (keyboard::Key::Character(c), _) => Command::InsertText(c.to_string()),
            (_, Key::Space) => Command::InsertText(" ".to_string()),
            (_, Key::Enter) => Command::SplitBlock,
            (_, Key::Backspace) => Command::DeleteBackward,
            (_, Key::Left) => Command::MoveLeft,
            (_, Key::Right) => Command::MoveRight,
            _ => return Task::none(),
        };
        self.run_command(command)
    }
}

/// Converts an iced key event into the keymap's terms.
pub fn key_press(key: &keyboard::Key, modifiers: keyboard::Modifiers) -> Option<KeyPress> {
    use keyboard::key::Named;

    let key = match key {
        keyboard::Key::Character(c) => {
            let mut chars = c.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Key::Char(ch),
                _ => return None,
            }
        }
        keyboard::Key::Named(Named::Enter) => Key::Enter,
        keyboard::Key::Named(Named::Tab) => Key::Tab,
        keyboard::Key::Named(Named::Backspace) => Key::Backspace,
        keyboard::Key::Named(Named::Delete) => Key::Delete,
        keyboard::Key::Named(Named::Escape) => Key::Escape,
        keyboard::Key::Named(Named::ArrowLeft) => Key::Left,
        keyboard::Key::Named(Named::ArrowRight) => Key::Right,
        keyboard::Key::Named(Named::Space) => Key::Space,
        _ => return None,
    };

    Some(KeyPress::new(
        key,
        Modifiers {
            ctrl: modifiers.control(),
            alt: modifiers.alt(),
            shift: modifiers.shift(),
            meta: modifiers.logo(),
        },
    ))
}
