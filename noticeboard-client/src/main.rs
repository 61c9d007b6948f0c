use noticeboard_client::{config, consumer, notes::Note};

use serde_json::to_string_pretty;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log setup
    tracing_subscriber::fmt::init();

    let cfg = config::load_config().inspect_err(|e| {
        tracing::error!("Failed to load client config: {e}");
    })?;

    consumer::run(&cfg, |note| print_note("Looked up note", note), |note| {
        print_note("Note received", note);
    })
    .await
    .inspect_err(|e| {
        tracing::error!("{e}");
    })?;

    tracing::info!("finished");

    Ok(())
}

fn print_note(label: &str, note: &Note) {
    match to_string_pretty(note) {
        Ok(json) => println!("{label}: {json}"),
        Err(_) => println!("{label}: {}", note.content),
    }
}
