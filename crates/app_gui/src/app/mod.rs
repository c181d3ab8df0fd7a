//! Main window: pick an image, run a model, show the text it produces.

pub(crate) mod settings;

use std::path::PathBuf;

use anyhow::Context;
use eframe::{App, Frame, egui};
use rfd::FileDialog;
use vision_core::{
    ACCEPTED_EXTENSIONS, ImageModel, ImagePath, ModelKind, VisionConfig, VisionError, load_model,
    run_selected, select,
};

const PREVIEW_SIZE: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Panel {
    Results,
    Settings,
}

pub(crate) struct UiApp {
    config: VisionConfig,
    config_path: Option<PathBuf>,
    selected: Option<ImagePath>,
    result_text: String,
    status: String,
    panel: Panel,
    classifier: Option<Box<dyn ImageModel>>,
    face_detector: Option<Box<dyn ImageModel>>,
    preview: Option<egui::TextureHandle>,
    pending_score_threshold: f32,
    pending_nms_threshold: f32,
}

impl UiApp {
    pub(crate) fn new(config: VisionConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            pending_score_threshold: config.face_detector.score_threshold,
            pending_nms_threshold: config.face_detector.nms_threshold,
            config,
            config_path,
            selected: None,
            result_text: String::new(),
            status: String::new(),
            panel: Panel::Results,
            classifier: None,
            face_detector: None,
            preview: None,
        }
    }

    fn select_image(&mut self) {
        let picked = FileDialog::new()
            .add_filter("Image files", &ACCEPTED_EXTENSIONS)
            .pick_file()
            .map(|p| p.to_string_lossy().into_owned());
        let outcome = select(picked.as_deref());
        self.status = outcome.notice().unwrap_or_default();
        self.selected = outcome.into_selection();
        self.preview = None;
    }

    fn run_model(&mut self, kind: ModelKind) {
        // Checked before loading so a missing image never costs a model load.
        if self.selected.is_none() {
            self.status = VisionError::NoSelection.to_string();
            return;
        }
        let slot = match kind {
            ModelKind::Classifier => &mut self.classifier,
            ModelKind::FaceDetector => &mut self.face_detector,
        };
        if slot.is_none() {
            match load_model(kind, &self.config) {
                Ok(model) => *slot = Some(model),
                Err(err) => {
                    self.result_text = err.to_string();
                    return;
                }
            }
        }
        let Some(model) = slot.as_deref() else {
            return;
        };
        match run_selected(model, self.selected.as_ref()) {
            Ok(text) => {
                self.result_text = text;
                self.status = format!("{kind} finished.");
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn copy_result(&mut self) {
        self.status = match copy_to_clipboard(&self.result_text) {
            Ok(()) => "Result copied to clipboard.".to_string(),
            Err(e) => {
                tracing::warn!("{e:#}");
                format!("Could not copy result: {e:#}")
            }
        };
    }

    fn preview_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        if let Some(tex) = &self.preview {
            return Some(tex.id());
        }
        let path = self.selected.as_ref()?;
        match image::open(path.as_path()) {
            Ok(img) => {
                let thumb = image::imageops::thumbnail(&img, PREVIEW_SIZE, PREVIEW_SIZE);
                let size = [thumb.width() as usize, thumb.height() as usize];
                let color = egui::ColorImage::from_rgba_unmultiplied(size, thumb.as_raw());
                let tex = ctx.load_texture(
                    format!("preview:{path}"),
                    color,
                    egui::TextureOptions::LINEAR,
                );
                let id = tex.id();
                self.preview = Some(tex);
                Some(id)
            }
            Err(e) => {
                tracing::warn!("failed to load preview for {path}: {e}");
                None
            }
        }
    }

    fn render_results_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.label("Choose an image for classification or face detection:");
        match self.selected.clone() {
            Some(path) => {
                ui.label(format!("Selected: {path}"));
                if let Some(id) = self.preview_texture(ctx) {
                    let size = self
                        .preview
                        .as_ref()
                        .map(|t| t.size_vec2())
                        .unwrap_or(egui::Vec2::splat(PREVIEW_SIZE as f32));
                    ui.image((id, size));
                }
            }
            None => {
                ui.label("No image selected.");
            }
        }
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.heading("Result:");
            if ui
                .add_enabled(!self.result_text.is_empty(), egui::Button::new("Copy"))
                .clicked()
            {
                self.copy_result();
            }
        });
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.result_text.as_str())
                        .desired_width(f32::INFINITY)
                        .desired_rows(10),
                );
            });
    }
}

fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
    clipboard
        .set_text(text.to_owned())
        .context("clipboard rejected the text")?;
    Ok(())
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Select Image").clicked() {
                    self.select_image();
                }
                if ui.button("Run Image Classification").clicked() {
                    self.run_model(ModelKind::Classifier);
                }
                if ui.button("Run Face Detection").clicked() {
                    self.run_model(ModelKind::FaceDetector);
                }
                let (label, target) = match self.panel {
                    Panel::Results => ("Settings", Panel::Settings),
                    Panel::Settings => ("Back", Panel::Results),
                };
                if ui.button(label).clicked() {
                    self.panel = target;
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.panel {
            Panel::Results => self.render_results_panel(ctx, ui),
            Panel::Settings => self.render_settings_panel(ui),
        });
    }
}
