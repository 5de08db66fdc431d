use circle_progress::{CircleProgress, CircleProgressConfig, Color, ProgressCommand};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> circle_progress::Result<()> {
    tracing_subscriber::fmt().init();

    let config = CircleProgressConfig::builder()
        .max(100)
        .prefix_text("Filled ".to_string())
        .title("Random Fill".to_string())
        .build();

    let mut progress = CircleProgress::new(config);

    let (sender, receiver) = mpsc::channel();

    // Fill up in random steps, then start over with a new level color.
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut level = 0;
        loop {
            level += rng.random_range(1..8);
            let mut commands = vec![ProgressCommand::SetProgress(level)];
            if level >= 100 {
                level = 0;
                commands.push(ProgressCommand::SetFinishedColor(Color::rgb(
                    rng.random_range(0..=255),
                    rng.random_range(0..=255),
                    rng.random_range(0..=255),
                )));
            }

            if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                break;
            }

            thread::sleep(Duration::from_millis(120));
        }
    });

    println!("Displaying a randomly filling progress disc. Press Ctrl+C to exit.");
    progress.show_with_commands(receiver)
}
