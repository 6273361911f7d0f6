use eframe::{egui, Frame};
use egui::{Context, RichText};
use log::{error, info};

use story_core::config::ProviderConfig;
use story_core::model::provider::{load_model, StoryModel};
use story_core::model::request::{LENGTH_RANGE, LENGTH_STEP, TEMPERATURE_RANGE, TEMPERATURE_STEP};
use story_core::session::{GenerationResult, Phase, StoryController};

const TITLE: &str = "📖 AI Story Maker";
const PROMPT_HINT: &str = "For example: A friendly robot that likes to garden.";

/// What the window offers.
///
/// Without a model only the startup error is shown, never the controls.
enum Screen {
    Ready(StoryController<Box<dyn StoryModel>>),
    Unavailable(String),
}

/// Window state kept across frames: the loaded controller and the prompt draft.
struct StoryMakerUI {
    screen: Screen,
    /// Prompt being edited, submitted only on click.
    draft: String,
}

impl StoryMakerUI {
    fn new(screen: Screen) -> Self {
        Self { screen, draft: String::new() }
    }
}

/// Sidebar with the two generation sliders.
fn settings_panel<M: StoryModel>(ctx: &Context, controller: &mut StoryController<M>) {
    egui::SidePanel::left("settings")
        .resizable(false)
        .min_width(240.0)
        .show(ctx, |ui| {
            ui.heading("⚙️ Settings");
            ui.label("Control the story's details here.");
            ui.add_space(8.0);

            let mut max_length = controller.settings().max_length();
            let length = egui::Slider::new(&mut max_length, LENGTH_RANGE)
                .step_by(LENGTH_STEP as f64)
                .text("Story Length (tokens)");
            if ui
                .add(length)
                .on_hover_text("How long should the story be? Counted in model tokens, not words.")
                .changed()
            {
                controller.set_max_length(max_length);
            }

            let mut temperature = controller.settings().temperature();
            let creativity = egui::Slider::new(&mut temperature, TEMPERATURE_RANGE)
                .step_by(TEMPERATURE_STEP as f64)
                .fixed_decimals(1)
                .text("Creativity (Temperature)");
            if ui
                .add(creativity)
                .on_hover_text("Higher values make the story more creative, but maybe less logical.")
                .changed()
            {
                controller.set_temperature(temperature);
            }

            ui.separator();
            ui.small(format!("Story engine: {}", controller.model().name()));
        });
}

/// Prompt editor and submit button.
fn prompt_column<M: StoryModel>(ui: &mut egui::Ui, controller: &mut StoryController<M>, draft: &mut String) {
    ui.label(RichText::new("What is your story about?").size(18.0).strong());
    ui.add(
        egui::TextEdit::multiline(draft)
            .hint_text(PROMPT_HINT)
            .desired_rows(7)
            .desired_width(f32::INFINITY),
    );

    let idle = controller.phase() != Phase::Generating;
    let button = egui::Button::new("✨ Write My Story!").min_size(egui::vec2(ui.available_width(), 40.0));
    if ui.add_enabled(idle, button).clicked() && controller.begin(draft).is_ok() {
        // Paint the spinner once before the blocking call on the next frame
        ui.ctx().request_repaint();
    }
}

/// Warning, progress and the latest result.
fn story_column<M: StoryModel>(ui: &mut egui::Ui, controller: &StoryController<M>) {
    if let Some(warning) = controller.warning() {
        ui.colored_label(ui.visuals().warn_fg_color, format!("⚠ {warning}"));
    }

    if controller.phase() == Phase::Generating {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("An AI author is writing your story...");
        });
    }

    match controller.result() {
        Some(GenerationResult::Story(story)) => {
            ui.label(RichText::new("Your New Story:").size(18.0).strong());
            egui::Frame::group(ui.style()).show(ui, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.label(story);
                });
            });
        }
        Some(GenerationResult::Failed(reason)) => {
            ui.colored_label(ui.visuals().error_fg_color, format!("An error occurred: {reason}"));
        }
        None => {}
    }
}

fn startup_error(ctx: &Context, reason: &str) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading(TITLE);
        ui.separator();
        ui.colored_label(
            ui.visuals().error_fg_color,
            format!("Error: Could not load the story engine. Please restart. Details: {reason}"),
        );
    });
}

impl eframe::App for StoryMakerUI {
    /// UI update loop (called every frame).
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        let controller = match &mut self.screen {
            Screen::Ready(controller) => controller,
            Screen::Unavailable(reason) => {
                startup_error(ctx, reason);
                return;
            }
        };

        // Submitted last frame, the spinner is already on screen
        if controller.phase() == Phase::Generating {
            controller.finish();
        }

        settings_panel(ctx, controller);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(TITLE);
            ui.separator();

            ui.columns(2, |columns| {
                prompt_column(&mut columns[0], controller, &mut self.draft);
                story_column(&mut columns[1], controller);
            });
        });
    }
}

/// Acquires the story engine once for the whole process.
fn load_screen() -> Screen {
    match load_model(&ProviderConfig::default()) {
        Ok(model) => {
            info!("Story engine loaded");
            Screen::Ready(StoryController::new(model))
        }
        Err(e) => {
            error!("Could not load the story engine: {e}");
            Screen::Unavailable(e.to_string())
        }
    }
}

/// Application entry point.
fn main() -> eframe::Result {
    env_logger::init();

    let screen = load_screen();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Story Maker")
            .with_inner_size([960.0, 560.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "story-maker",
        options,
        Box::new(move |_| Ok(Box::new(StoryMakerUI::new(screen)))),
    )
}
