//! Settings panel and model configuration discovery.

use std::path::{Path, PathBuf};

use directories_next::ProjectDirs;
use eframe::egui;
use vision_core::VisionConfig;

use super::{Panel, UiApp};

const CONFIG_FILE: &str = "models.toml";

/// Where the model configuration lives for this user, if a home exists.
pub(crate) fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "ImageInsight", "ImageInsight")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Load the user's model configuration, falling back to defaults.
pub(crate) fn load_config() -> (VisionConfig, Option<PathBuf>) {
    let path = config_path();
    let config = match &path {
        Some(p) => load_config_from(p),
        None => {
            tracing::warn!("no config directory available, using default model paths");
            VisionConfig::default()
        }
    };
    (config, path)
}

fn load_config_from(path: &Path) -> VisionConfig {
    match VisionConfig::load_or_default(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("ignoring unreadable config {}: {e:#}", path.display());
            VisionConfig::default()
        }
    }
}

impl UiApp {
    /// Renders model paths, detector thresholds, and version info.
    pub(super) fn render_settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.add_space(8.0);
        match &self.config_path {
            Some(p) => ui.label(format!("Configuration file: {}", p.display())),
            None => ui.label("Configuration file: (none, using defaults)"),
        };
        ui.label(format!(
            "Classifier model: {}",
            self.config.classifier.model_path.display()
        ));
        ui.label(format!(
            "Classifier labels: {}",
            self.config.classifier.labels_path.display()
        ));
        ui.label(format!(
            "Face detector model: {}",
            self.config.face_detector.model_path.display()
        ));

        ui.add_space(12.0);
        ui.add(
            egui::Slider::new(&mut self.pending_score_threshold, 0.0..=1.0)
                .text("Face score threshold")
                .custom_formatter(|v, _| format!("{:.0}%", v * 100.0)),
        );
        ui.add(
            egui::Slider::new(&mut self.pending_nms_threshold, 0.0..=1.0)
                .text("Overlap (NMS) threshold")
                .custom_formatter(|v, _| format!("{:.0}%", v * 100.0)),
        );
        ui.horizontal(|ui| {
            if ui.button("Apply").clicked() {
                self.apply_detector_thresholds();
                self.panel = Panel::Results;
            }
            if ui.button("Reload configuration").clicked() {
                self.reload_config();
            }
        });

        ui.add_space(16.0);
        ui.separator();
        ui.label(format!(
            "App version: {}",
            env!("IMAGE_INSIGHT_VERSION")
        ));
        ui.label(format!("Core version: {}", vision_core::version()));
    }

    fn apply_detector_thresholds(&mut self) {
        let fd = &mut self.config.face_detector;
        fd.score_threshold = self.pending_score_threshold;
        fd.nms_threshold = self.pending_nms_threshold;
        // thresholds are baked into the loaded detector
        self.face_detector = None;
        self.status = format!(
            "Face detection thresholds applied: score {:.0}%, overlap {:.0}%",
            fd.score_threshold * 100.0,
            fd.nms_threshold * 100.0
        );
    }

    fn reload_config(&mut self) {
        self.config = match &self.config_path {
            Some(p) => load_config_from(p),
            None => VisionConfig::default(),
        };
        self.pending_score_threshold = self.config.face_detector.score_threshold;
        self.pending_nms_threshold = self.config.face_detector.nms_threshold;
        self.classifier = None;
        self.face_detector = None;
        self.status = "Configuration reloaded.".to_string();
    }
}
