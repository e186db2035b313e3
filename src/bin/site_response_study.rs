use siteresp::prelude::*;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "site_response_study",
    about = "Validates the inputs of a parametric site-response study and writes one configuration file per sweep point"
)]
struct Options {
    /// Study description (JSON)
    config: String,

    /// Directory where Results_<name> is created and motion_dir is resolved
    #[structopt(long, default_value = ".")]
    root: String,

    /// Skip missing ground-motion files instead of aborting
    #[structopt(long)]
    skip_missing: bool,
}

fn main() -> Result<(), Error> {
    // logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // parse options
    let options = Options::from_args();

    // load data
    let config = StudyConfig::read_json(&options.config)?;
    let base = config.base_parameters()?;
    let mut study = config.build_study(&options.root)?;
    if options.skip_missing {
        study.set_missing_input_policy(MissingInputPolicy::Skip);
    }

    // validate inputs
    study.prepare_inputs()?;

    // sweep table
    println!(
        "{:>6} {:>16} {:>8} {:>10} {:>8} {:>12} {:>12}",
        "point", "ground_motion", "numEle", "eleSize", "numNodeY", "a0", "a1"
    );
    for point in study.sweep_points() {
        let run = study.run_configuration(&point, &base)?;
        println!(
            "{:>6} {:>16} {:>8} {:>10.4} {:>8} {:>12.6e} {:>12.6e}",
            point.index,
            point.ground_motion().unwrap_or("-"),
            run.mesh.num_ele(),
            run.mesh.ele_size(),
            run.mesh.num_node_y(),
            run.analysis.a0(),
            run.analysis.a1(),
        );
    }

    // write files
    let paths = study.write_run_configs(&base)?;
    let summary = study.write_summary()?;

    // message
    let path_summary = summary.display().to_string();
    let thin_line = format!("{:─^1$}", "", path_summary.len());
    println!("\n{}", thin_line);
    println!("{} run configuration files written; the summary file is:", paths.len());
    println!("{}", path_summary);
    println!("{}\n", thin_line);
    Ok(())
}
