//! Application-wide constants.

/// The display name of the application.
pub const APP_NAME: &str = "MotiBeam";

/// The binary name of the application.
pub const APP_BINARY_NAME: &str = "motibeam";

/// Directory name used under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "MotiBeam";

/// Version string shown on the boot screen and in the System settings section.
pub const OS_VERSION: &str = "MotiBeam OS v4.0";

/// Tagline shown under the logo.
pub const TAGLINE: &str = "Ambient Intelligence Projection";

/// File name prefix a scene plugin must carry to be considered.
pub const SCENE_FILE_PREFIX: &str = "scene_";

/// File name suffix a scene plugin must carry to be considered.
pub const SCENE_FILE_SUFFIX: &str = ".toml";

/// Environment variable forcing a windowed (inline) viewport.
pub const ENV_WINDOWED: &str = "MOTIBEAM_WINDOWED";

/// Environment variable forcing fullscreen. Wins over [`ENV_WINDOWED`].
pub const ENV_FULLSCREEN: &str = "MOTIBEAM_FULLSCREEN";
