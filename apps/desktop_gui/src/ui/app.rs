use std::time::Duration;

use client_core::{AnswerFallback, FormController};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

const FIELD_WIDTH: f32 = 300.0;

#[derive(Debug, Clone, PartialEq, Eq)]
enum BackendHealth {
    Checking,
    Reachable(String),
    Unreachable(String),
}

pub struct CloneAiApp {
    controller: FormController,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    server_url: String,
    health: BackendHealth,
    worker_info: Option<String>,
}

impl CloneAiApp {
    pub fn new(
        server_url: String,
        fallback: AnswerFallback,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        let mut app = Self {
            controller: FormController::new(fallback),
            cmd_tx,
            ui_rx,
            server_url,
            health: BackendHealth::Checking,
            worker_info: None,
        };
        app.check_backend();
        app
    }

    fn check_backend(&mut self) {
        self.health = BackendHealth::Checking;
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, BackendCommand::CheckBackend) {
            self.health = BackendHealth::Unreachable(err.to_string());
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.worker_info = Some(message);
                }
                UiEvent::BackendReachable { message } => {
                    self.health = BackendHealth::Reachable(
                        message.unwrap_or_else(|| "Backend is up".to_string()),
                    );
                }
                UiEvent::BackendUnreachable(message) => {
                    self.health = BackendHealth::Unreachable(message);
                }
                UiEvent::AddTextSettled(result) => {
                    self.controller.finish_add_text(result);
                }
                UiEvent::QuerySettled(result) => {
                    self.controller.finish_query(result);
                }
            }
        }
    }

    fn submit_add_text(&mut self) {
        let Some(request) = self.controller.begin_add_text() else {
            return;
        };
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, BackendCommand::AddText(request))
        {
            self.controller.finish_add_text(Err(err));
        }
    }

    fn submit_query(&mut self) {
        let Some(request) = self.controller.begin_query() else {
            return;
        };
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, BackendCommand::QueryAi(request))
        {
            self.controller.finish_query(Err(err));
        }
    }

    fn show_add_text_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Add Personal Data");
        ui.add_space(6.0);

        let mut title_buf = self.controller.title().to_string();
        ui.add(
            egui::TextEdit::singleline(&mut title_buf)
                .hint_text("Title...")
                .desired_width(FIELD_WIDTH),
        );
        if title_buf != self.controller.title() {
            self.controller.set_title(title_buf);
        }

        let mut content_buf = self.controller.content().to_string();
        ui.add(
            egui::TextEdit::multiline(&mut content_buf)
                .hint_text("Content...")
                .desired_rows(4)
                .desired_width(FIELD_WIDTH),
        );
        if content_buf != self.controller.content() {
            self.controller.set_content(content_buf);
        }

        ui.horizontal(|ui| {
            let busy = self.controller.is_add_text_in_flight();
            if ui
                .add_enabled(!busy, egui::Button::new("Add Text"))
                .clicked()
            {
                self.submit_add_text();
            }
            if busy {
                ui.spinner();
            } else if let Some(status) = self.controller.status().message() {
                ui.label(status);
            }
        });
    }

    fn show_query_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Ask AI");
        ui.add_space(6.0);

        let mut query_buf = self.controller.query().to_string();
        let response = ui.add(
            egui::TextEdit::singleline(&mut query_buf)
                .hint_text("Ask a question...")
                .desired_width(FIELD_WIDTH),
        );
        if query_buf != self.controller.query() {
            self.controller.set_query(query_buf);
        }
        let enter_pressed =
            response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

        ui.horizontal(|ui| {
            let busy = self.controller.is_query_in_flight();
            let clicked = ui
                .add_enabled(!busy, egui::Button::new("Get Answer"))
                .clicked();
            if clicked || (enter_pressed && !busy) {
                self.submit_query();
            }
            if busy {
                ui.spinner();
            }
        });
    }

    fn show_answer(&self, ui: &mut egui::Ui) {
        let Some(answer) = self.controller.answer() else {
            return;
        };
        ui.add_space(20.0);
        ui.label(egui::RichText::new("AI's Response:").strong().size(16.0));
        ui.label(answer);
    }

    fn show_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match &self.health {
                BackendHealth::Checking => {
                    ui.spinner();
                    ui.weak(format!("Contacting {}", self.server_url));
                }
                BackendHealth::Reachable(message) => {
                    ui.colored_label(egui::Color32::from_rgb(67, 181, 129), "●");
                    ui.label(message);
                }
                BackendHealth::Unreachable(message) => {
                    ui.colored_label(egui::Color32::from_rgb(237, 66, 69), "●");
                    ui.label(message);
                }
            }
            if ui.small_button("Retry").clicked() {
                self.check_backend();
            }
            if let Some(info) = &self.worker_info {
                ui.separator();
                ui.weak(info);
            }
        });
    }
}

impl eframe::App for CloneAiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.show_status_bar(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Personal AI - Phase 1 (Text Only)");
                ui.add_space(12.0);
                self.show_add_text_section(ui);
                ui.add_space(30.0);
                self.show_query_section(ui);
                self.show_answer(ui);
            });
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
