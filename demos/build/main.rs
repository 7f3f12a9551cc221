extern crate oclutil;

use std::env;
use std::process;

use oclutil::{create_compute_context, load_program_source, print_build_log, ComputeConfig, Program};

fn main() {
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: build <kernel.cl> [vendor]");
            process::exit(2);
        }
    };

    let mut config = ComputeConfig::default();
    if let Some(vendor) = env::args().nth(2) {
        config = config.preferred_vendor(vendor);
    }

    let source = match load_program_source(&path) {
        Some(source) => source,
        None => {
            eprintln!("Unable to open {} for reading", path);
            process::exit(1);
        }
    };

    let compute = match create_compute_context(&config) {
        Ok(compute) => compute,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let program = match Program::from_source(&compute.context, &source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = program.build(&compute.device, "") {
        eprintln!("{}", e);
    }
    print_build_log(Some(&program), &compute.device);
}
