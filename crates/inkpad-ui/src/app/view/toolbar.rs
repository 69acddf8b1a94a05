use iced::widget::{Space, button, container, horizontal_space, row, text, text_input, tooltip};
use iced::{Background, Border, Element, Font, Length, Padding, Theme, font};

use inkpad_core::toolbar::{self, ToolbarButton};

use crate::app::{App, Message};
use crate::theme::colors;

/// Short label drawn on a button for its icon name.
fn glyph(icon: &str) -> &'static str {
    match icon {
        "format_bold" => "B",
        "format_italic" => "I",
        "format_underlined" => "U",
        "code" => "</>",
        "looks_one" => "H1",
        "looks_two" => "H2",
        "format_quote" => "\u{201C}",
        "format_list_numbered" => "1.",
        "format_list_bulleted" => "\u{2022}",
        "image" => "URL",
        "folder_open" => "File",
        "save" => "Save",
        "cancel" => "Cancel",
        _ => "?",
    }
}

fn glyph_font(icon: &str) -> Font {
    match icon {
        "format_bold" => Font {
            weight: font::Weight::Bold,
            ..Font::DEFAULT
        },
        "format_italic" => Font {
            style: font::Style::Italic,
            ..Font::DEFAULT
        },
        "code" => Font::MONOSPACE,
        _ => Font::DEFAULT,
    }
}

fn toolbar_button(item: ToolbarButton) -> Element<'static, Message> {
    let active = item.active;
    let label = text(glyph(item.icon))
        .size(13)
        .font(glyph_font(item.icon))
        .color(if active { colors::TEXT_PRIMARY } else { colors::TEXT_SECONDARY });

    let control = button(label)
        .padding(Padding::from([4, 10]))
        .style(move |_: &Theme, status: button::Status| {
            let bg = match (active, status) {
                (true, _) => colors::BG_ACTIVE,
                (false, button::Status::Hovered) => colors::BG_HOVER,
                (false, _) => colors::BG_MEDIUM,
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: colors::TEXT_PRIMARY,
                border: Border {
                    color: if active { colors::ACCENT } else { colors::BORDER },
                    width: 1.0,
                    radius: 4.0.into(),
                },
                ..Default::default()
            }
        })
        .on_press(Message::Command(item.command));

    tooltip(
        control,
        container(text(item.label).size(12).color(colors::TEXT_PRIMARY))
            .padding(6)
            .style(|_| container::Style {
                background: Some(Background::Color(colors::BG_LIGHT)),
                border: Border {
                    color: colors::BORDER,
                    width: 1.0,
                    radius: 4.0.into(),
                },
                ..Default::default()
            }),
        tooltip::Position::Bottom,
    )
    .into()
}

impl App {
    pub fn view_toolbar(&self) -> Element<'_, Message> {
        let mut formatting = row![].spacing(4).align_y(iced::Alignment::Center);
        let buttons = toolbar::buttons(&self.session);
        let marks = toolbar::MARK_BUTTONS.len();
        let blocks = toolbar::BLOCK_BUTTONS.len();

        for (index, item) in buttons.into_iter().enumerate() {
            if index == marks || index == marks + blocks {
                formatting = formatting.push(Space::with_width(10));
            }
            formatting = formatting.push(toolbar_button(item));
        }

        let ceiling = row![
            text("Max nodes").size(12).color(colors::TEXT_MUTED),
            text_input("0", self.session.ceiling_input())
                .on_input(Message::CeilingInputChanged)
                .padding(Padding::from([4, 8]))
                .size(13)
                .width(Length::Fixed(64.0)),
        ]
        .spacing(6)
        .align_y(iced::Alignment::Center);

        let [save, cancel] = toolbar::session_buttons(&self.session);

        container(
            row![
                formatting,
                horizontal_space(),
                ceiling,
                Space::with_width(12),
                toolbar_button(save),
                toolbar_button(cancel),
            ]
            .spacing(4)
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::from([6, 12]))
        .width(Length::Fill)
        .style(|_| container::Style {
            background: Some(Background::Color(colors::BG_MEDIUM)),
            border: Border {
                color: colors::BORDER,
                width: 1.0,
                radius: 0.0.into(),
            },
            ..Default::default()
        })
        .into()
    }
}
