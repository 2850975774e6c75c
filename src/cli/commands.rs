//! Subcommand handlers.

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::args::{ConfigAction, RenderOptions};
use crate::ascii::{cell_size, Palette, Theme};
use crate::camera::{load_frame, load_frames, Frame, FrameSequence, Resolution, SourceVisual};
use crate::config::{default_path as get_config_path, Config};
use crate::context::{RenderContext, TickOutcome};
use crate::event_loop::{self, run_frames, FrameTick, RenderSession};
use crate::export::{self, ExportError, ExportKind};
use crate::renderer::{terminal_size, RecordingSurface, ScreenGuard, TerminalSurface};
use crate::strip::{compose_strip, date_caption, run_sequence, SequencePlan, StripEvent};

type CliResult = Result<(), Box<dyn Error>>;

/// Merge settings: CLI args > config file > built-in defaults.
pub fn apply_render_options(config: &mut Config, opts: &RenderOptions) {
    if let Some(density) = opts.density {
        config.render.density = density;
    }
    if let Some(palette) = opts.palette {
        config.render.palette = Palette::from(palette).name().to_string();
    }
    if opts.color {
        config.render.monochrome = false;
    }
    if let Some(theme) = opts.theme {
        config.render.theme = Theme::from(theme);
    }
}

fn new_context(config: &Config) -> RenderContext {
    let mut ctx = RenderContext::new(config.render_config(), config.container_size());
    ctx.set_theme(config.render.theme);
    ctx
}

/// Render a raster once and print it, or save text and PNG exports.
pub fn run_render(image: &Path, save: bool, out_dir: Option<PathBuf>, config: &Config) -> CliResult {
    let frame = load_frame(image)?;
    let mut ctx = new_context(config);
    ctx.set_source(SourceVisual::raster(frame));

    let mut surface = RecordingSurface::new();
    if !ctx.tick(&mut surface).is_rendered() {
        return Err(format!("Nothing could be rendered from {}", image.display()).into());
    }

    if save {
        let dir = out_dir.unwrap_or_else(|| config.export_dir());
        save_exports(&ctx, &dir, export::epoch_millis())?;
    } else {
        print!("{}", ctx.export_text());
    }
    Ok(())
}

/// Write the TXT and PNG exports of the current frame and print their paths.
fn save_exports(ctx: &RenderContext, dir: &Path, epoch_ms: u128) -> Result<(), ExportError> {
    let text_path = export::save_text(dir, &ctx.export_text(), epoch_ms)?;
    println!("Saved {}", text_path.display());

    let img = ctx.export_visual()?.ok_or(ExportError::NothingRendered)?;
    let png_path = export::save_png(dir, ExportKind::Png, &img, epoch_ms)?;
    println!("Saved {}", png_path.display());
    Ok(())
}

/// Live view in the terminal that follows terminal resizes.
struct LiveView {
    session: RenderSession<TerminalSurface<io::Stdout>>,
    bounds: (u16, u16),
}

impl LiveView {
    /// Container box matching the terminal at the current cell size.
    fn container_for(&self) -> Resolution {
        let cell = cell_size(self.session.context.config().density());
        let (cols, rows) = self.bounds;
        Resolution::new(cols as u32 * cell, rows as u32 * cell)
    }
}

impl FrameTick for LiveView {
    fn on_frame(&mut self, now: Duration) -> TickOutcome {
        let bounds = terminal_size();
        if bounds != self.bounds {
            self.bounds = bounds;
            self.session.surface.set_bounds(bounds.0, bounds.1);
        }
        let container = self.container_for();
        if container != self.session.context.container_size() {
            self.session.context.set_container_size(container);
        }
        self.session.on_frame(now)
    }
}

/// Play frames as a live feed until Ctrl+C.
pub fn run_live(
    path: &Path,
    fps: Option<u32>,
    no_transition: bool,
    config: &Config,
) -> CliResult {
    let frames = load_frames(path)?;
    let fps = fps.unwrap_or(config.live.fps);

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })?;

    let bounds = terminal_size();
    let mut ctx = new_context(config);
    ctx.set_source(SourceVisual::live(FrameSequence::new(frames)));
    if !no_transition {
        ctx.animate_density_to(config.render_config().density);
    }
    let surface = TerminalSurface::new(io::stdout(), bounds.0, bounds.1);
    let mut view = LiveView {
        session: RenderSession::new(ctx, surface),
        bounds,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let mut guard = ScreenGuard::enter()?;
    let stats = runtime.block_on(event_loop::run(&mut view, fps, running));
    guard.exit()?;

    log::info!(
        "Live view stopped after {} frame(s), {} rendered",
        stats.frames,
        stats.rendered
    );
    Ok(())
}

fn describe(event: &StripEvent, photos: u32) -> String {
    match event {
        StripEvent::Countdown { count, photo_num } => {
            format!("Photo {} of {}: {}...", photo_num, photos, count)
        }
        StripEvent::Flash { photo_num } => format!("Photo {} of {}: *flash*", photo_num, photos),
        StripEvent::Preview { photo_num, image } => match image {
            Some(img) => format!(
                "Photo {} of {}: captured {}x{}",
                photo_num, photos, img.width, img.height
            ),
            None => format!("Photo {} of {}: capture failed", photo_num, photos),
        },
    }
}

/// Options of the `strip` subcommand.
pub struct StripOptions {
    pub single: bool,
    pub json: bool,
    pub caption: Option<String>,
    pub mirror: bool,
    pub out_dir: Option<PathBuf>,
}

/// Run the capture flow against a frame feed, then export the result.
pub fn run_strip(path: &Path, opts: StripOptions, config: &Config) -> CliResult {
    let frames = load_frames(path)?;
    let plan = if opts.single {
        SequencePlan::single()
    } else {
        SequencePlan::strip()
    };

    let mut ctx = new_context(config);
    ctx.set_source(SourceVisual::live(FrameSequence::new(frames)));

    let runtime = tokio::runtime::Runtime::new()?;
    let photos = runtime.block_on(run_sequence(
        plan,
        || ctx.capture_frame(opts.mirror),
        |event| {
            if opts.json {
                match serde_json::to_string(event) {
                    Ok(line) => println!("{}", line),
                    Err(e) => log::warn!("Failed to encode event: {}", e),
                }
            } else {
                println!("{}", describe(event, plan.photos));
            }
        },
    ))?;

    let images: Vec<_> = photos.iter().filter_map(|p| p.to_rgba_image()).collect();
    let epoch_ms = export::epoch_millis();
    let dir = opts.out_dir.unwrap_or_else(|| config.export_dir());

    let result = if opts.single {
        images.into_iter().next()
    } else {
        let caption = opts.caption.unwrap_or_else(date_caption);
        let strip = compose_strip(&images, Some(caption.as_str()))?;
        if let Some(strip) = &strip {
            let path = export::save_png(&dir, ExportKind::Strip, strip, epoch_ms)?;
            println!("Saved {}", path.display());
        }
        strip
    };
    let Some(result) = result else {
        return Err("No photos were captured".into());
    };

    // Hold the still, swap it in as the source, then ease the density in
    ctx.freeze();
    ctx.set_source(SourceVisual::raster(Frame::from_rgba_image(result)));
    ctx.unfreeze();
    let target = config.render_config().density;
    ctx.animate_density_to(target);

    let mut session = RenderSession::new(ctx, RecordingSurface::new());
    let outcomes = run_frames(
        &mut session,
        [0u64, 250, 500, 750, 1000].map(Duration::from_millis),
    );
    if !outcomes.last().is_some_and(TickOutcome::is_rendered) {
        return Err("Captured photo could not be rendered".into());
    }

    save_exports(&session.context, &dir, epoch_ms)?;
    Ok(())
}

/// List palettes with their glyphs.
pub fn list_palettes() {
    println!("Available palettes:");
    for palette in Palette::ALL {
        let glyphs: String = palette.chars().iter().collect();
        let marker = if palette == Palette::default() {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:<9} {:>2} glyphs  \"{}\"{}",
            palette.name(),
            palette.chars().len(),
            glyphs,
            marker
        );
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, explicit: Option<&Path>) -> CliResult {
    let config_path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&config_path))?;
            println!("Current configuration:");
            println!();
            print!("{}", config.to_toml()?);
            println!();
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            if config_path.exists() {
                return Err(format!(
                    "Config file already exists: {}\nUse 'ascii-booth config show' to view current settings.",
                    config_path.display()
                )
                .into());
            }
            Config::default().save(&config_path)?;
            println!("Created config file: {}", config_path.display());
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{PaletteName, ThemeName};

    #[test]
    fn test_cli_options_override_config() {
        let mut config = Config::default();
        config.render.palette = "blocks".to_string();
        apply_render_options(
            &mut config,
            &RenderOptions {
                density: Some(90),
                palette: Some(PaletteName::Matrix),
                color: true,
                theme: Some(ThemeName::Retro),
            },
        );
        assert_eq!(config.render.density, 90);
        assert_eq!(config.render.palette, "matrix");
        assert!(!config.render.monochrome);
        assert_eq!(config.render.theme, Theme::Retro);
    }

    #[test]
    fn test_unset_options_keep_config() {
        let mut config = Config::default();
        config.render.density = 33;
        config.render.monochrome = false;
        apply_render_options(&mut config, &RenderOptions::default());
        assert_eq!(config.render.density, 33);
        assert!(!config.render.monochrome);
        assert_eq!(config.render.palette, "standard");
    }

    #[test]
    fn test_describe_events() {
        let e = StripEvent::Countdown {
            count: 2,
            photo_num: 3,
        };
        assert_eq!(describe(&e, 4), "Photo 3 of 4: 2...");
        let e = StripEvent::Preview {
            photo_num: 1,
            image: None,
        };
        assert_eq!(describe(&e, 1), "Photo 1 of 1: capture failed");
    }

    #[test]
    fn test_config_init_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ascii-booth").join("config.toml");
        handle_config_action(ConfigAction::Init, Some(&path)).unwrap();
        assert!(path.exists());
        assert!(handle_config_action(ConfigAction::Init, Some(&path)).is_err());
        handle_config_action(ConfigAction::Show, Some(&path)).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
    }

    #[test]
    fn test_render_saves_exports() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("in.png");
        image::RgbaImage::from_pixel(30, 18, image::Rgba([0, 0, 0, 255]))
            .save(&image)
            .unwrap();

        let config = Config::default();
        run_render(&image, true, Some(dir.path().to_path_buf()), &config).unwrap();

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("ascii-photo-"))
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with(".png"));
        assert!(names[1].ends_with(".txt"));
    }
}
