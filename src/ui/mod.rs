/// View layer
///
/// Purely reactive: everything here reads the application state and builds
/// widgets; all mutation happens through messages handled in `update`.

use iced::widget::{
    button, column, container, horizontal_rule, horizontal_space, pick_list, row, scrollable,
    text, text_editor, Column,
};
use iced::{Alignment, Element, Length};

use crate::state::data::{ImageStatus, NameStyle, ProcessedImage};
use crate::{CopyTarget, ImageNamer, Message};

pub fn view(app: &ImageNamer) -> Element<'_, Message> {
    let busy = app.generating || app.ingesting;

    let header = row![
        text("Image Namer").size(28),
        horizontal_space(),
        text("Style:"),
        pick_list(NameStyle::ALL, Some(app.style), Message::StyleSelected),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let generate_label = if app.generating {
        "Generating…"
    } else {
        "Generate Names"
    };
    let controls = row![
        button("Add Images")
            .padding(10)
            .on_press_maybe((!busy).then_some(Message::PickFiles)),
        button("Add Folder")
            .padding(10)
            .on_press_maybe((!busy).then_some(Message::PickFolder)),
        horizontal_space(),
        button(generate_label)
            .padding(10)
            .on_press_maybe((!busy && app.store.has_queued()).then_some(Message::GenerateAll)),
        button(copy_all_label(app))
            .padding(10)
            .style(button::secondary)
            .on_press_maybe(app.store.has_completed().then_some(Message::CopyAll)),
        button("Clear All")
            .padding(10)
            .style(button::danger)
            .on_press_maybe((!app.store.is_empty()).then_some(Message::ClearAll)),
    ]
    .spacing(10);

    let mut url_editor =
        text_editor(&app.url_input).placeholder("One image URL per line, e.g. https://example.com/cat.jpg");
    if !busy {
        url_editor = url_editor.on_action(Message::UrlInputEdited);
    }
    let url_section = row![
        url_editor.height(72),
        button("Fetch URLs")
            .padding(10)
            .on_press_maybe((!busy).then_some(Message::FetchUrls)),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let banner = app.error_banner.as_deref().map(|message| {
        container(
            row![
                text(message).style(text::danger),
                horizontal_space(),
                button("Dismiss")
                    .style(button::text)
                    .on_press(Message::DismissError),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        )
        .style(container::bordered_box)
        .padding(10)
        .width(Length::Fill)
    });

    let list: Element<'_, Message> = if app.store.is_empty() {
        container(
            text("Add images, drop them on the window, or fetch URLs to get started")
                .style(text::secondary),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    } else {
        let mut items = Column::new().spacing(8);
        for image in app.store.images() {
            items = items.push(item_row(app, image));
        }
        scrollable(items).height(Length::Fill).into()
    };

    Column::new()
        .push(header)
        .push(controls)
        .push(url_section)
        .push_maybe(banner)
        .push(horizontal_rule(1))
        .push(list)
        .spacing(16)
        .padding(20)
        .into()
}

fn copy_all_label(app: &ImageNamer) -> &'static str {
    if app.copied == Some(CopyTarget::All) {
        "Copied!"
    } else {
        "Copy All"
    }
}

fn item_row<'a>(app: &'a ImageNamer, image: &'a ProcessedImage) -> Element<'a, Message> {
    let thumbnail: Element<'a, Message> = match app.thumbnails.get(&image.id) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(56)
            .height(56)
            .into(),
        None => horizontal_space().width(56).into(),
    };

    let status: Element<'a, Message> = match &image.status {
        ImageStatus::Queued => text("Queued").style(text::secondary).into(),
        ImageStatus::Generating => text("Generating…").into(),
        ImageStatus::Completed { suggested_name } => {
            let copied = matches!(&app.copied, Some(CopyTarget::Item(id)) if id == &image.id);
            row![
                text(suggested_name).style(text::success),
                button(if copied { "Copied!" } else { "Copy" })
                    .style(button::secondary)
                    .on_press(Message::CopyName(image.id.clone())),
            ]
            .spacing(10)
            .align_y(Alignment::Center)
            .into()
        }
        ImageStatus::Error { message } => text(message).style(text::danger).into(),
    };

    container(
        row![
            thumbnail,
            column![text(&image.name).size(14), status].spacing(4),
            horizontal_space(),
            button("Remove")
                .style(button::text)
                .on_press(Message::RemoveImage(image.id.clone())),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .style(container::rounded_box)
    .padding(8)
    .width(Length::Fill)
    .into()
}
