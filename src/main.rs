use std::path::{Path, PathBuf};

use clap::{Parser, ValueHint};
use living_room::{config::RoomConfig, LivingRoomApp};

const DEFAULT_CONFIG: &str = "room.toml";

#[derive(Debug, Parser)]
#[command(author, version, about = "Animated, textured living room")]
struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn",
        env = "LIVING_ROOM_LOG"
    )]
    log_filter: String,
    /// Settings file; `room.toml` is used when present
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// OBJ file placed on the table
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    mesh: Option<PathBuf>,
    /// Scale applied to the mesh while parsing
    #[arg(long, value_name = "FACTOR")]
    mesh_scale: Option<f32>,
    /// Flip the mesh's face normals
    #[arg(long)]
    reverse_normals: bool,
    /// Directory holding the surface textures
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    textures: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<RoomConfig> {
        let mut config = match &self.config {
            Some(path) => RoomConfig::load(path)?,
            None if Path::new(DEFAULT_CONFIG).is_file() => RoomConfig::load(DEFAULT_CONFIG)?,
            None => RoomConfig::default(),
        };

        if let Some(mesh) = &self.mesh {
            config.mesh.path = Some(mesh.clone());
        }
        if let Some(scale) = self.mesh_scale {
            config.mesh.scale = scale;
        }
        if self.reverse_normals {
            config.mesh.reverse_normals = true;
        }
        if let Some(textures) = &self.textures {
            config.assets.texture_dir = textures.clone();
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .parse_filters(&cli.log_filter)
        .init();

    let config = cli.load_config()?;
    log::debug!("{config:?}");

    LivingRoomApp::new(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_filter_reads_its_environment_variable() {
        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == "log_filter")
            .unwrap();
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new("LIVING_ROOM_LOG")));
    }

    #[test]
    fn mesh_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "living-room",
            "--log-filter",
            "debug",
            "--mesh",
            "vase.obj",
            "--mesh-scale",
            "2.5",
            "--reverse-normals",
        ])
        .unwrap();
        assert_eq!(cli.log_filter, "debug");
        assert_eq!(cli.mesh_scale, Some(2.5));
        assert!(cli.reverse_normals);
        assert_eq!(cli.mesh.as_deref(), Some(Path::new("vase.obj")));
    }
}
