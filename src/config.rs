use std::sync::OnceLock;

pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Tracker backend selected at startup. Both implement the same
/// init/track interface, see `crate::tracker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ArgEnum)]
pub enum Backend {
    /// TrackerMIL, needs no model files
    Mil,
    /// TrackerNano, needs backbone and head ONNX models
    Nano,
}

#[derive(Debug)]
#[derive(clap::Parser)]
pub struct Config {
    /// Key poll timeout in milliseconds, also bounds the display refresh rate
    #[clap(long, default_value = "30")]
    pub poll_ms: i32,

    /// Depth camera color/depth stream width
    #[clap(long, default_value = "640")]
    pub cam_width: i32,

    /// Depth camera color/depth stream height
    #[clap(long, default_value = "480")]
    pub cam_height: i32,

    /// Depth camera frame rate
    #[clap(long, default_value = "60")]
    pub cam_rate: i32,

    #[clap(long, arg_enum, default_value = "mil")]
    pub backend: Backend,

    /// Backbone model for the nano backend
    #[clap(long, default_value = "nanotrack_backbone.onnx")]
    pub nano_backbone: String,

    /// Head model for the nano backend
    #[clap(long, default_value = "nanotrack_head.onnx")]
    pub nano_head: String,
}

impl Config {
    pub fn global() -> &'static Config {
        CONFIG.get().expect("config is set in main before use")
    }
}
