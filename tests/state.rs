use std::io::Cursor;
use std::sync::Arc;

use circle_progress::{
    CircleProgress, CircleProgressConfig, Color, ImageSource, ProgressCommand, ProgressSnapshot,
    ResourceId, ResourceRegistry, Scene, Size,
};
use image::{ImageFormat, Rgba, RgbaImage};
use pretty_assertions::assert_eq;

fn saved_indicator() -> CircleProgress {
    let config = CircleProgressConfig::builder()
        .finished_color(Color::from_argb(0xff4291f1))
        .unfinished_color(Color::from_argb(0xffcccccc))
        .max(100)
        .progress(42)
        .prefix_text(String::new())
        .suffix_text("%".to_string())
        .build();
    CircleProgress::new(config)
}

fn commands(progress: &mut CircleProgress) -> Vec<circle_progress::DrawCommand> {
    let font = progress.font();
    let mut scene = Scene::new(&font);
    progress.render(&mut scene);
    scene.into_commands()
}

#[test]
fn state_survives_a_json_round_trip() {
    let mut original = saved_indicator();
    original.set_finished_drawable(Some(ResourceId(5)));
    let json = original.save_state().to_json().unwrap();

    let mut restored = CircleProgress::new(
        CircleProgressConfig::builder()
            .finished_color(Color::BLACK)
            .max(7)
            .prefix_text("x".to_string())
            .build(),
    );
    restored.restore_state(ProgressSnapshot::from_json(&json).unwrap());

    assert_eq!(restored.finished_color(), original.finished_color());
    assert_eq!(restored.unfinished_color(), original.unfinished_color());
    assert_eq!(restored.text_color(), original.text_color());
    assert_eq!(restored.text_size(), original.text_size());
    assert_eq!(restored.finished_drawable(), Some(ResourceId(5)));
    assert_eq!(restored.max(), 100);
    assert_eq!(restored.progress(), 42);
    assert_eq!(restored.prefix_text(), "");
    assert_eq!(restored.suffix_text(), "%");
    assert_eq!(restored.draw_text(), "42%");
}

#[test]
fn restored_unfinished_drawable_is_the_saved_color() {
    let mut buffer = Cursor::new(Vec::new());
    RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]))
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    let skin = ImageSource::Bytes(Arc::from(buffer.into_inner()));

    let mut original = saved_indicator()
        .with_resources(ResourceRegistry::new().with(ResourceId(2), skin.clone()));
    original.set_unfinished_drawable(Some(ResourceId(2)));
    let snapshot = original.save_state();

    let mut restored = CircleProgress::new(CircleProgressConfig::default())
        .with_resources(ResourceRegistry::new().with(ResourceId(2), skin));
    restored.on_size_changed(Size::square(60.0));
    restored.restore_state(snapshot);

    assert_eq!(
        restored.unfinished_drawable(),
        Some(ResourceId(0xffcccccc_u32 as i32))
    );

    // Nothing is registered under the color value, so the skin is dropped.
    let mut reference = saved_indicator();
    reference.on_size_changed(Size::square(60.0));
    assert_eq!(commands(&mut restored), commands(&mut reference));
}

#[test]
fn restore_through_the_command_channel() {
    let snapshot = saved_indicator().save_state();
    let (sender, receiver) = std::sync::mpsc::channel();
    sender.send(ProgressCommand::SetProgress(3)).unwrap();
    sender.send(ProgressCommand::Restore(snapshot)).unwrap();
    drop(sender);

    let mut progress = CircleProgress::new(CircleProgressConfig::default());
    for command in receiver {
        progress.apply(command);
    }
    assert_eq!(progress.progress(), 42);
    assert!(progress.needs_redraw());
}
