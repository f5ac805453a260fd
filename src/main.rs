//! # tero CLI
//!
//! Management entry point: run the web server or call an image helper.
//!
//! ## Usage
//! ```bash
//! tero --settings app/settings.yaml runserver 0.0.0.0:8000
//! tero hash photo.jpg --algorithm perceptual
//! tero compare-hash 8f373714acfcf4d0 8f373714acfcf4d1
//! ```

mod cli;

use tero::Result;

fn main() -> Result<()> {
    cli::run()
}
