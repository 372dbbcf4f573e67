use std::time::Duration;

use eframe::egui;

use super::components::{chat_area, input_bar, sidebar};
use super::state::{AppState, LiveSession};

pub struct ChatApp {
    state: AppState,
}

impl ChatApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, session: LiveSession) -> Self {
        Self {
            state: AppState::new(session),
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.session.pump();
        self.state.session.maintain();

        egui::SidePanel::left("partner_sidebar")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                let partners = self.state.session.cache().partner_activity();
                let selected = self.state.selected_partner.as_deref();
                if let Some(partner) = sidebar::render(ui, partners, selected) {
                    self.state.select(partner);
                }
            });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let peers = self.state.session.connected_peers().len();
                ui.label(format!("Peers connected: {peers}"));
                if let Some(status) = self.state.session.status() {
                    ui.separator();
                    ui.label(egui::RichText::new(status).weak());
                }
            });
        });

        if self.state.selected_partner.is_some() {
            egui::TopBottomPanel::bottom("input_bar").show(ctx, |ui| {
                if input_bar::render(ui, &mut self.state.input_text) {
                    self.state.submit_input();
                }
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(partner) = self.state.selected_partner.as_deref() else {
                ui.centered_and_justified(|ui| {
                    ui.label("Select a user to start chatting");
                });
                return;
            };

            ui.horizontal(|ui| {
                ui.label("Chatting with:");
                ui.strong(partner);
            });
            ui.separator();

            let session = &self.state.session;
            let thread = session.cache().messages_with(partner);
            chat_area::render(ui, &thread, session.viewer());
        });

        ctx.request_repaint_after(Duration::from_millis(200));
    }
}

impl Drop for ChatApp {
    fn drop(&mut self) {
        self.state.session.close();
    }
}
