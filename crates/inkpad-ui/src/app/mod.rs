use iced::widget::image;
use iced::{Subscription, Task, event, keyboard, window};
use std::collections::HashMap;

use inkpad_core::{Config, EventHandler, FileStore, Keymap, MemoryStore, Session, Store};
use inkpad_doc::Node;

pub mod messages;
pub mod update;
pub mod view;

pub use messages::*;

use crate::style::DocumentStyle;
use crate::theme::Theme;

/// Startup options, built by the binary from config and CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub config: Config,
}

pub struct App {
    pub session: Session,
    pub keymap: Keymap,
    pub events: EventHandler,
    pub theme: Theme,
    pub style: DocumentStyle,
    /// Font size from config, restored by zoom reset
    pub base_font_size: f32,
    pub placeholder: String,
    pub status_message: String,
    /// Text of the image URL prompt while it is open
    pub url_prompt: Option<String>,
    /// Leaf block under the pointer, used as the drop target
    pub hovered_block: Option<usize>,
    pub modifiers: keyboard::Modifiers,
    /// Decoded `data:` images, keyed by src
    pub images: HashMap<String, image::Handle>,
}

impl App {
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let Flags { config } = flags;

        let store: Box<dyn Store> = match config.storage.resolved_dir() {
            Ok(dir) => {
                tracing::info!("Storing documents in {}", dir.display());
                Box::new(FileStore::new(dir))
            }
            Err(e) => {
                tracing::warn!("{}; edits will not outlive this window", e);
                Box::new(MemoryStore::new())
            }
        };

        let session = Session::open(store, &config);
        let events = EventHandler::new(session.subscribe());
        let theme = Theme::named(&config.ui.theme).with_font_size(config.ui.font_size);

        let mut app = Self {
            session,
            keymap: Keymap::from_config(&config),
            events,
            theme,
            style: DocumentStyle::default(),
            base_font_size: config.ui.font_size,
            placeholder: config.editor.placeholder.clone(),
            status_message: "Ready | Ctrl+S: Save | Ctrl+Z: Undo | Ctrl+B/I/U: Marks".to_string(),
            url_prompt: None,
            hovered_block: None,
            modifiers: keyboard::Modifiers::default(),
            images: HashMap::new(),
        };
        app.refresh_images();

        (app, Task::none())
    }

    pub fn title(&self) -> String {
        let modified = if self.session.modified() { " *" } else { "" };
        format!("Inkpad{}", modified)
    }

    pub fn theme(&self) -> iced::Theme {
        self.theme.iced_theme()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let keyboard_sub = keyboard::on_key_press(|key, modifiers| {
            Some(Message::KeyPressed(key, modifiers))
        });

        let window_sub = event::listen_with(|event, _status, _id| match event {
            iced::Event::Window(window::Event::FileDropped(path)) => {
                Some(Message::FileDropped(path))
            }
            iced::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                Some(Message::ModifiersChanged(modifiers))
            }
            _ => None,
        });

        Subscription::batch([keyboard_sub, window_sub])
    }

    /// Keeps the decoded image cache in step with the document.
    pub fn refresh_images(&mut self) {
        fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a str>) {
            for node in nodes {
                match node {
                    Node::Image(image) => out.push(&image.src),
                    other => {
                        if let Some(children) = other.children() {
                            collect(children, out);
                        }
                    }
                }
            }
        }

        let mut sources = Vec::new();
        collect(&self.session.value().document().nodes, &mut sources);

        self.images.retain(|src, _| sources.contains(&src.as_str()));
        for src in sources {
            if self.images.contains_key(src) {
                continue;
            }
            if let Some((_, bytes)) = inkpad_core::image::decode_data_url(src) {
                self.images
                    .insert(src.to_string(), image::Handle::from_bytes(bytes));
            }
        }
    }
}

pub fn run(flags: Flags) -> iced::Result {
    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .window_size(iced::Size::new(960.0, 720.0))
        .theme(App::theme)
        .antialiasing(true)
        .run_with(move || App::new(flags))
}
