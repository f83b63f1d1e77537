//! Print a named profile as a config file.

use std::path::PathBuf;

use pathcurve_common::config::Profile;

pub fn run(profile: Profile, output: Option<PathBuf>) -> anyhow::Result<()> {
    let config = profile.config();

    match output {
        Some(path) => {
            config
                .save_to(&path)
                .map_err(|e| anyhow::anyhow!("Failed to save profile: {e}"))?;
            println!("Profile '{profile}' written to: {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }

    Ok(())
}
