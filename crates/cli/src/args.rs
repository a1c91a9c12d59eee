use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nmapreport")]
#[command(version)]
#[command(about = "Produce a pretty report from a nmap xml", long_about = None)]
pub struct Cli {
    /// Input nmap xml
    #[arg(value_parser = existing_file)]
    pub filename: PathBuf,

    /// Directory of Recog fingerprint databases (*.xml)
    #[arg(short, long, env = "NMAPREPORT_FINGERPRINTS", default_value = "fingerprints")]
    pub fingerprints: PathBuf,

    /// Output format: xml, text, json
    #[arg(short, long, default_value = "xml")]
    pub output_format: String,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("'{}' is not an existing file", value))
    }
}
