//! Compiler settings

/// Cranelift optimization level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OptLevel {
    None,
    #[default]
    Speed,
    SpeedAndSize,
}

impl OptLevel {
    /// Value of Cranelift's `opt_level` setting.
    pub fn as_flag(self) -> &'static str {
        match self {
            OptLevel::None => "none",
            OptLevel::Speed => "speed",
            OptLevel::SpeedAndSize => "speed_and_size",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JitSettings {
    pub opt_level: OptLevel,
    /// Keep the Cranelift IR text of every compiled function
    pub capture_ir: bool,
}

impl JitSettings {
    pub fn with_opt_level(mut self, opt_level: OptLevel) -> Self {
        self.opt_level = opt_level;
        self
    }

    pub fn with_capture_ir(mut self, capture_ir: bool) -> Self {
        self.capture_ir = capture_ir;
        self
    }
}
