//! `concierge ask`: Answer a single question from the command line.

use std::io::Write;

use concierge_config::AppConfig;
use concierge_core::StreamFrame;

pub async fn run(message: String, stream: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let concierge = concierge_gateway::build_concierge(&config)?;
    let message = message.trim();

    if !stream {
        println!("{}", concierge.answer(message));
        return Ok(());
    }

    let pace = config.stream.pace();
    let mut stdout = std::io::stdout();
    for (index, frame) in concierge.answer_stream(message).into_iter().enumerate() {
        if index > 0 && !pace.is_zero() {
            tokio::time::sleep(pace).await;
        }
        match frame {
            StreamFrame::Chunk(text) => {
                write!(stdout, "{text}")?;
                stdout.flush()?;
            }
            StreamFrame::Done => writeln!(stdout)?,
        }
    }

    Ok(())
}
