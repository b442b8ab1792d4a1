mod audio;
mod cli;
mod overlays;
mod paths;
mod render;
mod run;
mod simulate;

use anyhow::Result;
use cli::Command;
use run::HostContext;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    let context = HostContext::load(cli.settings.as_deref())?;
    match cli.command {
        Command::Simulate(args) => {
            let reports = simulate::simulate(&context, &args)?;
            simulate::print_reports(&reports, args.json)
        }
        Command::Audio(args) => {
            let reports = audio::step_audio(&context, &args);
            audio::print_ticks(&reports, args.json)
        }
        Command::Render(args) => render::render(&context, &args),
        Command::Check => run_check(&context),
    }
}

fn run_check(context: &HostContext) -> Result<()> {
    let settings = context.settings.snapshot();
    let exists = context.settings_path.exists();

    println!(
        "Settings file: {}{}",
        context.settings_path.display(),
        if exists { "" } else { " (missing, using defaults)" }
    );
    println!("Version: {}", context.prefs.version);
    println!("Fade duration: {} ms", settings.fade_duration_ms);
    println!(
        "Fade colors: tr={} tl={} bl={} br={}",
        settings.fade_colors[0],
        settings.fade_colors[1],
        settings.fade_colors[2],
        settings.fade_colors[3]
    );
    println!(
        "Blur: {} (radius {})",
        if settings.blur_enabled {
            "enabled"
        } else {
            "disabled"
        },
        settings.blur_radius
    );

    if context.prefs.blur.blacklist.is_empty() {
        println!("Blacklist: (empty)");
    } else {
        println!("Blacklist:");
        let resolved: Vec<&str> = settings.blacklist.names().collect();
        for entry in &context.prefs.blur.blacklist {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let status = if resolved.contains(&entry) {
                "ok"
            } else {
                "skipped"
            };
            println!("  {entry:<24} {status}");
        }
    }

    println!(
        "Audio: channel={:?} inactive={:.2} minimized={:.2}",
        settings.duck_channel, settings.inactive_volume, settings.minimized_volume
    );
    Ok(())
}
