
use std::{
    path::Path,
    fs::File,
    io::{
        BufReader,
        BufWriter,
    },
};
use serde::{Serialize, Deserialize};
use anyhow::*;


pub const SETTINGS_FILE_NAME: &'static str = "physics.json";


/// World-wide physics settings. Read once at startup and handed to the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downwards acceleration in pixels/s².
    pub gravity_y: f32,
    /// Longest time step a body is moved by at once, in seconds.
    pub max_substep: f32,
    /// Per-frame x acceleration applied to a body hit by a particle.
    pub push_back_accel: f32,
    /// Number of frames the push back from a particle hit lasts.
    pub push_back_frames: usize,
    pub shake_amplitude: f32,
    /// In seconds.
    pub shake_duration: f32,
    /// Defaults for bodies with platformer physics.
    pub body: BodySettings,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        PhysicsSettings {
            gravity_y: 980.0,
            max_substep: 1.0 / 30.0,
            push_back_accel: 500.0,
            push_back_frames: 5,
            shake_amplitude: 1.0,
            shake_duration: 0.24,
            body: BodySettings::default(),
        }
    }
}

impl PhysicsSettings {
    pub fn read(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::try_read(path).unwrap_or_else(|e| {
            debug!(?path, %e, "using default physics settings");
            Self::default()
        })
    }

    pub fn try_read(path: impl AsRef<Path>) -> Result<Self> {
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), self)?;
        Ok(())
    }
}


/// Per-body movement limits and modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    /// In pixels/s².
    pub run_acceleration: f32,
    /// In pixels/s.
    pub vx_max: f32,
    /// In pixels/s.
    pub max_fall_speed: f32,
    /// In pixels/s.
    pub jump_speed: f32,
    /// In pixels/s.
    pub climb_speed: f32,
    /// Running in one direction and then pressing the other one stops the
    /// body before it accelerates the other way.
    pub stops_abruptly_on_direction_change: bool,
    /// Climb onto a full tile next to a slope even if the slope doesn't reach
    /// all the way up to it.
    pub allow_stairs_climb: bool,
    pub can_jump: bool,
}

impl Default for BodySettings {
    fn default() -> Self {
        BodySettings {
            run_acceleration: 300.0,
            vx_max: 150.0,
            max_fall_speed: 550.0,
            jump_speed: 330.0,
            climb_speed: 70.0,
            stops_abruptly_on_direction_change: true,
            allow_stairs_climb: true,
            can_jump: true,
        }
    }
}
