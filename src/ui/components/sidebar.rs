use eframe::egui;

use super::clock_label;
use crate::common::ConversationPartner;

/// Partner list, most recent first. Returns the partner clicked this frame.
pub fn render(
    ui: &mut egui::Ui,
    partners: &[ConversationPartner],
    selected: Option<&str>,
) -> Option<String> {
    ui.heading("Users");
    ui.separator();

    if partners.is_empty() {
        ui.label("No recent conversations");
        return None;
    }

    let mut clicked = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for partner in partners {
            ui.horizontal(|ui| {
                let is_selected = selected == Some(partner.id.as_str());
                if ui
                    .selectable_label(is_selected, partner.id.as_str())
                    .clicked()
                {
                    clicked = Some(partner.id.clone());
                }
                ui.label(egui::RichText::new(clock_label(partner.last_active)).weak());
            });
        }
    });

    clicked
}
