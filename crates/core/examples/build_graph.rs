use opgraph_core::{id::IdGenerator, sample};
use std::process::exit;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "build_graph")]
struct Opt {
    #[structopt(help = "The sample graph to build (1-based)")]
    index: Option<usize>,

    #[structopt(long = "edges", help = "Also list every edge as a label pair")]
    edges: bool,
}

fn usage() {
    println!(
        "Usage: build_graph <1~{}> [--edges]\n\nSamples:",
        sample::SAMPLES.len()
    );
    for (i, s) in sample::SAMPLES.iter().enumerate() {
        println!("  {}: {:<10} {}", i + 1, s.name, s.description);
    }
}

fn main() {
    env_logger::init();
    color_backtrace::install();

    let opt = Opt::from_args();

    let Some(index) = opt.index else {
        usage();
        return;
    };

    let sample = match sample::get(index) {
        Ok(sample) => sample,
        Err(e) => {
            log::error!("{e}");
            usage();
            exit(1);
        }
    };

    log::info!("build sample: {} ({})", sample.name, sample.description);
    let graph = match (sample.build)(IdGenerator::global()) {
        Ok(graph) => graph,
        Err(e) => {
            log::error!("failed to build {}: {e}", sample.name);
            exit(1);
        }
    };
    log::info!(
        "built {}: {} nodes, {} edges",
        sample.name,
        graph.len(),
        graph.edge_count()
    );

    print!("{graph}");
    if opt.edges {
        println!();
        for (from, to) in graph.edge_labels() {
            println!("{from} {to}");
        }
    }
}
