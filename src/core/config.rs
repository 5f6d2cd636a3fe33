// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Emulator configuration
//!
//! Settings are read from a TOML file. Every field has a default, so an
//! empty file (or no file) yields a usable configuration.
//!
//! ```toml
//! [cpu]
//! instructions_per_line = 2970
//!
//! [rsp]
//! instruction_budget = 8192
//!
//! [video]
//! lines_per_frame = 525
//! default_width = 320
//! default_height = 240
//!
//! [dma]
//! delay_ticks = 0
//!
//! [boot]
//! hle = false
//! ```

use crate::core::error::{EmulatorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    pub cpu: CpuConfig,
    pub rsp: RspConfig,
    pub video: VideoConfig,
    pub dma: DmaConfig,
    pub boot: BootConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    /// CPU instructions executed per video line
    pub instructions_per_line: u32,
}

impl Default for CpuConfig {
    fn default() -> Self {
        // 93.75 MHz / 60 Hz / 525 lines, at one instruction per two cycles
        Self {
            instructions_per_line: 2970,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RspConfig {
    /// Maximum RSP instructions per task slice
    pub instruction_budget: u32,
}

impl Default for RspConfig {
    fn default() -> Self {
        Self {
            instruction_budget: 8192,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Lines per frame when VI_V_SYNC is unprogrammed
    pub lines_per_frame: u32,
    /// Frame buffer size when VI_WIDTH is unprogrammed
    pub default_width: u32,
    pub default_height: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            lines_per_frame: 525,
            default_width: 320,
            default_height: 240,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DmaConfig {
    /// Ticks between a DMA being queued and its completion
    pub delay_ticks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Skip IPL3 and load the game directly at its entry point
    pub hle: bool,
}

impl EmulatorConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::config::EmulatorConfig;
    ///
    /// let config = EmulatorConfig::from_toml_str("[boot]\nhle = true\n").unwrap();
    /// assert!(config.boot.hle);
    /// assert_eq!(config.video.lines_per_frame, 525);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| EmulatorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| EmulatorError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.cpu.instructions_per_line == 0 {
            return Err(EmulatorError::Config(
                "cpu.instructions_per_line must be nonzero".to_string(),
            ));
        }
        if self.rsp.instruction_budget == 0 {
            return Err(EmulatorError::Config(
                "rsp.instruction_budget must be nonzero".to_string(),
            ));
        }
        if self.video.lines_per_frame == 0 {
            return Err(EmulatorError::Config(
                "video.lines_per_frame must be nonzero".to_string(),
            ));
        }
        if self.video.default_width == 0 || self.video.default_height == 0 {
            return Err(EmulatorError::Config(
                "video default resolution must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EmulatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, EmulatorConfig::default());
        assert_eq!(config.cpu.instructions_per_line, 2970);
        assert_eq!(config.dma.delay_ticks, 0);
        assert!(!config.boot.hle);
    }

    #[test]
    fn test_partial_sections() {
        let config = EmulatorConfig::from_toml_str(
            "[video]\nlines_per_frame = 262\n\n[dma]\ndelay_ticks = 4\n",
        )
        .unwrap();
        assert_eq!(config.video.lines_per_frame, 262);
        assert_eq!(config.video.default_width, 320);
        assert_eq!(config.dma.delay_ticks, 4);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let err = EmulatorConfig::from_toml_str("[rsp]\ninstruction_budget = 0\n").unwrap_err();
        assert!(matches!(err, EmulatorError::Config(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(EmulatorConfig::from_toml_str("[cpu\n").is_err());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let mut config = EmulatorConfig::default();
        config.boot.hle = true;
        config.rsp.instruction_budget = 1000;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = EmulatorConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }
}
