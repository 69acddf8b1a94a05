use iced::widget::{Space, button, column, container, row, text, text_input};
use iced::{Background, Border, Element, Length, Padding, Theme};

use crate::app::update::url_input_id;
use crate::app::{App, Message};
use crate::theme::colors;

fn dialog_button<'a>(label: &'a str, primary: bool, message: Message) -> Element<'a, Message> {
    button(text(label).size(13).color(colors::TEXT_PRIMARY))
        .padding(Padding::from([8, 20]))
        .style(move |_: &Theme, status: button::Status| {
            let bg = match (primary, status) {
                (true, button::Status::Hovered) => colors::ACCENT.scale_alpha(0.85),
                (true, _) => colors::ACCENT,
                (false, button::Status::Hovered) => colors::BG_HOVER,
                (false, _) => colors::BG_LIGHT,
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: colors::TEXT_PRIMARY,
                border: Border {
                    color: colors::BORDER,
                    width: if primary { 0.0 } else { 1.0 },
                    radius: 4.0.into(),
                },
                ..Default::default()
            }
        })
        .on_press(message)
        .into()
}

impl App {
    pub fn view_url_prompt(&self) -> Element<'_, Message> {
        let input = self.url_prompt.as_deref().unwrap_or_default();

        let modal_content = column![
            text("Insert Image").size(16).color(colors::TEXT_PRIMARY),
            Space::with_height(12),
            text("Enter the URL of the image:").size(13).color(colors::TEXT_SECONDARY),
            Space::with_height(8),
            text_input("https://example.com/picture.png", input)
                .id(url_input_id())
                .on_input(Message::UrlPromptChanged)
                .on_submit(Message::UrlPromptSubmit)
                .padding(Padding::from([8, 12]))
                .size(13),
            Space::with_height(16),
            row![
                dialog_button("Cancel", false, Message::UrlPromptCancel),
                Space::with_width(12),
                dialog_button("Insert", true, Message::UrlPromptSubmit),
            ]
            .align_y(iced::Alignment::Center),
        ]
        .padding(24)
        .width(Length::Fixed(420.0));

        container(container(modal_content).style(|_| container::Style {
            background: Some(Background::Color(colors::BG_MEDIUM)),
            border: Border {
                color: colors::BORDER,
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        }))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }
}
