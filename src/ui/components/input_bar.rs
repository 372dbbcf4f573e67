use eframe::egui;

/// Returns true when the user asked to send the current line.
pub fn render(ui: &mut egui::Ui, input_text: &mut String) -> bool {
    let mut send = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(input_text).hint_text("Type your message..."),
        );
        let ready = !input_text.trim().is_empty();

        if ui.add_enabled(ready, egui::Button::new("Send")).clicked() {
            send = true;
        }

        if ready && response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
            response.request_focus();
        }
    });

    send
}
