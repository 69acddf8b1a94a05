pub mod dialogs;
pub mod document;
pub mod toolbar;

use iced::widget::{Space, column, container, horizontal_space, mouse_area, row, stack, text};
use iced::{Background, Color, Element, Length, Padding};

use crate::app::{App, Message};
use crate::theme::colors;

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let content = column![
            self.view_toolbar(),
            self.view_document(),
            self.view_status_bar(),
        ];

        let main_view: Element<'_, Message> = container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_| container::Style {
                background: Some(Background::Color(colors::BG_DARK)),
                ..Default::default()
            })
            .into();

        if self.url_prompt.is_some() {
            stack![
                main_view,
                mouse_area(
                    container(Space::new(Length::Fill, Length::Fill))
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .style(|_| container::Style {
                            background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.5))),
                            ..Default::default()
                        })
                )
                .on_press(Message::UrlPromptCancel),
                self.view_url_prompt(),
            ]
            .into()
        } else {
            main_view
        }
    }

    fn view_status_bar(&self) -> Element<'_, Message> {
        let value = self.session.value();
        let count = value.top_level_node_count();
        let ceiling = self.session.ceiling();
        let count_color = if count > ceiling {
            colors::DANGER
        } else {
            colors::TEXT_SECONDARY
        };

        let selection = value.selection();
        let caret = format!("Block {}, Col {}", selection.focus.block + 1, selection.focus.offset + 1);

        container(
            row![
                text(&self.status_message).size(12).color(colors::TEXT_SECONDARY),
                horizontal_space(),
                text(caret).size(12).color(colors::TEXT_MUTED),
                Space::with_width(16),
                text(format!("{} / {} nodes", count, ceiling)).size(12).color(count_color),
                Space::with_width(16),
                text(if self.session.modified() { "Modified" } else { "Saved" })
                    .size(12)
                    .color(colors::TEXT_MUTED),
            ]
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::from([4, 12]))
        .width(Length::Fill)
        .style(|_| container::Style {
            background: Some(Background::Color(colors::BG_MEDIUM)),
            ..Default::default()
        })
        .into()
    }
}
