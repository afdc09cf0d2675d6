use chrono::Utc;

use ride_bridge::{
    config::Configuration,
    data_types::sync::SyncResponse,
    util::logging::{self, LogLevel},
    App,
};

const USAGE: &str = "Valid commands:
  latest   synchronizes up to the last 30 days of Peloton rides to Garmin Connect.";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match args.as_slice() {
        [command] => command.as_str(),
        _ => {
            println!("Missing command argument.");
            println!("{}", USAGE);
            return;
        }
    };

    let path = match Configuration::default_file() {
        Ok(path) => path,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    if !path.exists() {
        println!("Unable to find configuration file {}", path.display());
        println!("Please create this file and fill in your details, its format is:");
        for line in Configuration::render_example().lines() {
            println!("    {}", line);
        }
        return;
    }

    let config = match Configuration::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    match command {
        "latest" => {
            if std::env::var("RIDE_BRIDGE_VERBOSE").is_ok() {
                logging::set_global_level(LogLevel::VERBOSE);
            }
            print_response(&App::from_configuration(config).sync(Utc::now()));
        }
        other => println!("Unknown command '{}'", other),
    }
}

fn print_response(response: &SyncResponse) {
    for record in response.result.iter().flatten() {
        if record.was_created {
            println!("Created a new Garmin activity:");
        } else {
            println!("Matching Garmin activity:");
        }
        println!("  {} {}", record.activity_date, record.title);
        println!("  {}", record.description);
        println!("  {}", record.peloton_link);
        println!("  {}", record.garmin_link);
        println!();
    }

    for failure in &response.failures {
        println!("Failed to sync {} ({}):", failure.peloton_link, failure.reached);
        println!("  {}", failure.error);
        println!();
    }

    if let Some(error) = &response.error {
        println!("Sync stopped: {}", error);
    }
}
