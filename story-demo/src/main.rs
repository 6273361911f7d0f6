use story_core::config::ProviderConfig;
use story_core::model::provider::load_model;
use story_core::session::{GenerationResult, StoryController};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Local text-generation-inference server hosting TinyStories;
    // ProviderConfig::for_backend(Backend::Ollama) targets a local Ollama instead
    let config = ProviderConfig::default();

    // Acquire the model once; a failure here ends the session
    let model = load_model(&config)?;
    let mut controller = StoryController::new(model);

    // Length is counted in tokens, values outside 50..=300 are clamped
    controller.set_max_length(150);

    // Temperature is clamped into 0.5..=1.5
    controller.set_temperature(0.9);

    // An empty prompt is rejected before the model is called
    match controller.submit("   ") {
        Ok(_) => println!("Should not happen"),
        Err(warning) => println!("Warning: {warning}"),
    }

    // Generate the same story idea twice; sampling makes the results differ
    for i in 0..2 {
        match controller.submit("A friendly robot that likes to garden.")? {
            GenerationResult::Story(story) => println!("Your New Story ({}):\n{story}\n", i + 1),
            GenerationResult::Failed(reason) => println!("An error occurred: {reason}"),
        }
    }

    Ok(())
}
