use anyhow::{Context, Result};
use backdrop::gpu::{GpuContext, OffscreenFrame};
use backdrop::{FrameCompositor, FrameHost, Overlay, Rect, TransitionController};

use crate::cli::RenderArgs;
use crate::overlays::HostOverlay;
use crate::run::HostContext;

const CHECKER_CELL: u32 = 32;

pub fn render(context: &HostContext, args: &RenderArgs) -> Result<()> {
    let overlay = args
        .overlay
        .as_deref()
        .map(|tag| HostOverlay::open(&context.types, tag))
        .transpose()?;

    let gpu = GpuContext::headless(args.gpu_power.into())?;
    let (width, height) = args.size;
    let mut frame = OffscreenFrame::new(gpu, width, height)?;
    tracing::info!(
        adapter = %frame.gpu().adapter.name,
        backend = ?frame.gpu().adapter.backend,
        width,
        height,
        "rendering offscreen"
    );

    if args.no_scene {
        frame.clear_scene();
    } else if let Some(path) = &args.scene {
        let scene = image::open(path)
            .with_context(|| format!("failed to load scene image {}", path.display()))?
            .to_rgba8();
        frame.load_scene(&scene);
    } else {
        frame.load_checkerboard(CHECKER_CELL);
    }
    if args.no_chain {
        frame.remove_post_chain();
    }
    frame.set_ambient_blur(args.ambient);

    let compositor = FrameCompositor::default();
    let mut controller = TransitionController::new(context.settings.clone());
    controller.set_scene_present(frame.has_scene());
    compositor.apply_blur_to_frame(&mut frame);

    if let Some(overlay) = &overlay {
        controller.transition(Some(overlay));
        controller.tick(args.elapsed);
        let (width, height) = frame.size();
        compositor.draw_overlay_background(
            &mut controller,
            &mut frame,
            Rect::from_size(width, height),
        );
        let state = controller.state();
        tracing::info!(
            overlay = overlay.type_tag(),
            chain = compositor.chain_name(),
            blurring = state.blurring,
            fading_in = state.fading_in,
            radius = ?controller.active_blur_radius(),
            "overlay background drawn"
        );
    }

    let pixels = frame.read_pixels()?;
    frame.teardown();
    pixels
        .save(&args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    println!("{}", args.out.display());
    Ok(())
}
