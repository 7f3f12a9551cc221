extern crate oclutil;

use oclutil::{device_report, platform_report, Platform};

fn main() {
    let platforms = match Platform::all() {
        Ok(platforms) => platforms,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    for (i, platform) in platforms.iter().enumerate() {
        println!("Platform {}:", i);
        print!("{}", platform_report(platform));
        println!("Available GPU devices:");
        match platform.gpu_devices() {
            Ok(devices) => {
                for device in devices.iter() {
                    print!("{}", device_report(device));
                    println!();
                }
            }
            Err(e) => println!("   {}", e),
        }
    }
}
