use eframe::egui;

use super::clock_label;
use crate::common::ChatMessage;

const OWN_MESSAGE_COLOR: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);

pub fn render(ui: &mut egui::Ui, thread: &[&ChatMessage], viewer: &str) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in thread {
                let own = message.from == viewer;
                // viewer's own lines on the right
                let layout = if own {
                    egui::Layout::right_to_left(egui::Align::TOP)
                } else {
                    egui::Layout::left_to_right(egui::Align::TOP)
                };

                ui.with_layout(layout, |ui| {
                    let body = egui::RichText::new(message.body.as_str());
                    let body = if own { body.color(OWN_MESSAGE_COLOR) } else { body };
                    ui.label(body);
                    ui.label(
                        egui::RichText::new(clock_label(message.timestamp))
                            .small()
                            .weak(),
                    );
                });
            }
        });
}
