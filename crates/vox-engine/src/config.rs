//! Engine and player configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the espeak-ng synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspeakConfig {
    /// Program to run.
    #[serde(default = "default_espeak_program")]
    program: String,

    /// Arguments placed before the synthesis options, for engines started
    /// through a wrapper (`flatpak run ...`, `sh script`).
    #[serde(default)]
    args_prefix: Vec<String>,

    /// Extra arguments placed after the synthesis options.
    #[serde(default)]
    extra_args: Vec<String>,

    /// Maximum time a single synthesis may take.
    #[serde(default = "default_synthesis_timeout", with = "duration_secs")]
    timeout: Duration,
}

fn default_espeak_program() -> String {
    "espeak-ng".to_string()
}

fn default_synthesis_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for EspeakConfig {
    fn default() -> Self {
        Self {
            program: default_espeak_program(),
            args_prefix: Vec::new(),
            extra_args: Vec::new(),
            timeout: default_synthesis_timeout(),
        }
    }
}

impl EspeakConfig {
    /// Creates a new builder for EspeakConfig.
    pub fn builder() -> EspeakConfigBuilder {
        EspeakConfigBuilder::default()
    }

    /// Returns the program to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments placed before the synthesis options.
    pub fn args_prefix(&self) -> &[String] {
        &self.args_prefix
    }

    /// Returns the arguments placed after the synthesis options.
    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }

    /// Returns the synthesis timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the engine name used in logs and errors (the program's file name).
    pub fn engine_name(&self) -> &str {
        program_name(&self.program)
    }
}

/// Builder for EspeakConfig.
#[derive(Debug, Default)]
pub struct EspeakConfigBuilder {
    program: Option<String>,
    args_prefix: Vec<String>,
    extra_args: Vec<String>,
    timeout: Option<Duration>,
}

impl EspeakConfigBuilder {
    /// Sets the program to run.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Sets the arguments placed before the synthesis options.
    pub fn args_prefix(mut self, args: Vec<impl Into<String>>) -> Self {
        self.args_prefix = args.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an argument after the synthesis options.
    pub fn extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Sets the synthesis timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is blank or the timeout is zero.
    pub fn build(self) -> Result<EspeakConfig, &'static str> {
        let program = self.program.unwrap_or_else(default_espeak_program);
        if program.trim().is_empty() {
            return Err("program must not be empty");
        }
        let timeout = self.timeout.unwrap_or_else(default_synthesis_timeout);
        if timeout.is_zero() {
            return Err("timeout must be greater than zero");
        }

        Ok(EspeakConfig {
            program,
            args_prefix: self.args_prefix,
            extra_args: self.extra_args,
            timeout,
        })
    }
}

/// Configuration for a command-line audio player.
///
/// The WAV bytes are written to the player's stdin, so the arguments must
/// make the player read from standard input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Program to run.
    #[serde(default = "default_player_program")]
    program: String,

    /// Arguments for the program.
    #[serde(default = "default_player_args")]
    args: Vec<String>,

    /// Maximum time playback may take.
    #[serde(default = "default_playback_timeout", with = "duration_secs")]
    timeout: Duration,
}

fn default_player_program() -> String {
    "aplay".to_string()
}

fn default_player_args() -> Vec<String> {
    vec!["-q".to_string(), "-".to_string()]
}

fn default_playback_timeout() -> Duration {
    Duration::from_secs(300)
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            program: default_player_program(),
            args: default_player_args(),
            timeout: default_playback_timeout(),
        }
    }
}

impl PlayerConfig {
    /// Creates a new builder for PlayerConfig.
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Returns the program to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the program arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the playback timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the player name used in logs and errors.
    pub fn player_name(&self) -> &str {
        program_name(&self.program)
    }
}

/// Builder for PlayerConfig.
#[derive(Debug, Default)]
pub struct PlayerConfigBuilder {
    program: Option<String>,
    args: Option<Vec<String>>,
    timeout: Option<Duration>,
}

impl PlayerConfigBuilder {
    /// Sets the program to run.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Sets the program arguments.
    pub fn args(mut self, args: Vec<impl Into<String>>) -> Self {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the playback timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is blank or the timeout is zero.
    pub fn build(self) -> Result<PlayerConfig, &'static str> {
        let program = self.program.unwrap_or_else(default_player_program);
        if program.trim().is_empty() {
            return Err("program must not be empty");
        }
        let timeout = self.timeout.unwrap_or_else(default_playback_timeout);
        if timeout.is_zero() {
            return Err("timeout must be greater than zero");
        }

        Ok(PlayerConfig {
            program,
            args: self.args.unwrap_or_else(default_player_args),
            timeout,
        })
    }
}

fn program_name(program: &str) -> &str {
    Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program)
}

/// Whole seconds; zero is rejected like in the builders.
mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer, de::Error};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Redondea hacia arriba: un limite de 100ms no se escribe como 0
        let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
        serializer.serialize_u64(secs)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        if secs == 0 {
            return Err(D::Error::custom("timeout must be greater than zero"));
        }
        Ok(Duration::from_secs(secs))
    }
}
