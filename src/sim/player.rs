//! Arena player: health, score and the alive/dead lifecycle

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::camera::FpsCamera;

pub const PLAYER_MAX_HP: u32 = 100;
/// Hitbox sphere radius around the player's chest
pub const PLAYER_HITBOX_RADIUS: f32 = 0.6;
/// Chest sits this far below the eye
const CHEST_DROP: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    Alive,
    /// Terminal until an explicit reset
    Dead,
}

/// What a damage call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Player was already dead
    Ignored,
    Hurt { remaining: u32 },
    /// This call brought hp to zero
    Killed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub hp: u32,
    pub max_hp: u32,
    pub score: u64,
    pub kills: u32,
    pub phase: PlayerPhase,
    pub camera: FpsCamera,
    /// Red damage overlay, 0..1
    pub damage_flash: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(FpsCamera::default())
    }
}

impl PlayerState {
    pub fn new(camera: FpsCamera) -> Self {
        Self {
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            score: 0,
            kills: 0,
            phase: PlayerPhase::Alive,
            camera,
            damage_flash: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.phase == PlayerPhase::Alive
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }

    pub fn hitbox_center(&self) -> Vec3 {
        self.camera.position - Vec3::Y * CHEST_DROP
    }

    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }
        self.hp = self.hp.saturating_sub(amount);
        self.damage_flash = (self.damage_flash + amount as f32 / self.max_hp as f32 * 2.0).min(1.0);
        if self.hp == 0 {
            self.phase = PlayerPhase::Dead;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt { remaining: self.hp }
        }
    }

    pub fn add_kill(&mut self, reward: u64) {
        if self.is_alive() {
            self.kills += 1;
            self.score += reward;
        }
    }

    /// Back to full health at the spawn pose. Look settings are kept.
    pub fn reset(&mut self) {
        let camera = FpsCamera {
            sensitivity: self.camera.sensitivity,
            move_speed: self.camera.move_speed,
            ..FpsCamera::default()
        };
        *self = Self::new(camera);
    }

    pub fn decay_flash(&mut self, dt: f32) {
        self.damage_flash = (self.damage_flash - dt * 1.5).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_until_dead() {
        let mut player = PlayerState::default();
        assert_eq!(player.take_damage(30), DamageOutcome::Hurt { remaining: 70 });
        assert_eq!(player.take_damage(500), DamageOutcome::Killed);
        assert_eq!(player.hp, 0);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_dead_player_is_frozen() {
        let mut player = PlayerState::default();
        player.add_kill(100);
        player.take_damage(PLAYER_MAX_HP);
        assert_eq!(player.take_damage(10), DamageOutcome::Ignored);
        player.add_kill(100);
        assert_eq!(player.score, 100);
        assert_eq!(player.kills, 1);
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut player = PlayerState::default();
        player.camera.sensitivity = 0.01;
        player.camera.position = Vec3::new(5.0, 3.0, -2.0);
        player.add_kill(50);
        player.take_damage(PLAYER_MAX_HP);

        player.reset();
        assert!(player.is_alive());
        assert_eq!(player.hp, PLAYER_MAX_HP);
        assert_eq!(player.score, 0);
        assert_eq!(player.kills, 0);
        assert_eq!(player.camera.position, FpsCamera::default().position);
        assert_eq!(player.camera.sensitivity, 0.01);
    }
}
