//! `embryogen <scenario> [--fo-count N] [--no-prompt]`.

use clap::Parser;
use embryogen::SCENARIOS;

/// Runs one of the built-in simulation scenarios to completion.
#[derive(Parser, Debug)]
#[command(name = "embryogen", version, about = "EmbryoGen scenario runner")]
struct Args {
    /// Name of the scenario to run, e.g. `oneAgent`.
    scenario: String,

    /// Overrides the scenario's default number of FrontOfficers.
    #[arg(long = "fo-count")]
    fo_count: Option<usize>,

    /// Disables the post-round stdin prompt, running unattended.
    #[arg(long = "no-prompt")]
    no_prompt: bool,
}

fn print_scenario_list() {
    eprintln!("available scenarios:");
    for entry in SCENARIOS {
        eprintln!("  {}", entry.name);
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let Some(entry) = embryogen::find(&args.scenario) else {
        eprintln!("unknown scenario: {}", args.scenario);
        print_scenario_list();
        std::process::exit(1);
    };

    let mut scene = (entry.scene)();
    if let Some(fo_count) = args.fo_count {
        scene.fo_count = fo_count;
    }
    if args.no_prompt {
        scene.prompt_user = false;
    }

    match entry.run_with(scene) {
        Ok(director) => {
            tracing::info!(
                frames = director.frame_count,
                curr_time = director.curr_time,
                tracks = director.ctc.rows().count(),
                "scenario completed"
            );
        }
        Err(e) => {
            eprintln!("{} failed: {e}", args.scenario);
            std::process::exit(1);
        }
    }
}
